//! Fetch HTML documents over HTTP and reduce them to plain text.
//!
//! The crate has two halves. The fetcher ([`fetch`]) retrieves a document,
//! follows a bounded number of redirects itself and only returns a body for
//! a `200 text/html` response. The cleaner ([`clean`]) removes style and
//! script blocks, comments, tags and character references, in that order,
//! using plain text scans rather than a DOM.
//!
//! # Example
//!
//! ```rust
//! use htmlstrip_core::strip_html;
//!
//! let text = strip_html("<p>Hello, <strong>world</strong>!</p><!-- hidden -->");
//! assert_eq!(text, "Hello, world! ");
//! ```

pub mod clean;
pub mod entities;
pub mod error;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod headers;
pub mod strip;

pub use clean::{CleanConfig, CleanConfigBuilder, Stage, clean_html, strip_html};
pub use entities::{is_named_entity, strip_entities};
pub use error::{Result, StripError};
#[cfg(feature = "fetch")]
pub use fetch::{
    DEFAULT_REDIRECTS, Exchange, FetchConfig, FetchOutcome, Fetched, HttpTransport, Transport, fetch_file,
    fetch_html, fetch_html_with_redirects, fetch_outcome, fetch_stdin, fetch_url, parse_url,
};
pub use headers::{Headers, get_status_code, is_html, is_redirect};
pub use strip::{strip_comments, strip_element, strip_tags};
