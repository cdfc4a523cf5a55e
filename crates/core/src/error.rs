//! Error types for htmlstrip operations.
//!
//! This module defines [`StripError`], which covers the failures that are
//! surfaced to callers: malformed input and broken transports. Fetching a page
//! that simply is not HTML, or that redirects too often, is not an error; see
//! [`crate::fetch::FetchOutcome`].
//!
//! # Example
//!
//! ```rust
//! use htmlstrip_core::{StripError, Result};
//!
//! fn require_scheme(url: &str) -> Result<()> {
//!     if !url.contains("://") {
//!         return Err(StripError::InvalidUrl(url.to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fetching and stripping operations.
///
/// The markup-stripping passes never fail; every variant here comes from
/// URL parsing, HTTP transport, or local I/O.
#[derive(Error, Debug)]
pub enum StripError {
    /// HTTP transport errors from reqwest.
    ///
    /// Wraps connection refusals, DNS failures and read errors mid-body.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    ///
    /// Returned when a single HTTP request exceeds the configured timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    ///
    /// Returned before any network activity when a URL cannot be parsed or
    /// does not use the http or https scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Local I/O errors while reading files or stdin.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for StripError.
pub type Result<T> = std::result::Result<T, StripError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StripError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_timeout_error() {
        let err = StripError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = StripError::from(io);
        assert!(matches!(err, StripError::Io(_)));
        assert!(err.to_string().contains("pipe closed"));
    }
}
