//! Response header maps and the classifiers that read them.
//!
//! A [`Headers`] value holds the header fields of a single HTTP exchange,
//! keyed case-insensitively, with the status line stored under the empty
//! name. [`get_status_code`], [`is_redirect`] and [`is_html`] are pure
//! functions of that map.
//!
//! # Example
//!
//! ```rust
//! use htmlstrip_core::{Headers, get_status_code, is_html, is_redirect};
//!
//! let headers = Headers::parse("HTTP/1.1 302 Found\r\nLocation: /two\r\nContent-Type: text/html\r\n\r\n");
//! assert_eq!(get_status_code(&headers), Some(302));
//! assert!(is_redirect(&headers));
//! assert!(is_html(&headers));
//! assert_eq!(headers.location(), Some("/two"));
//! ```

use std::collections::BTreeMap;

/// Name under which the status line is stored.
pub const STATUS_LINE: &str = "";

/// Header fields of one HTTP response.
///
/// Names are stored lower-cased; each name maps to its values in the order
/// they were received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: BTreeMap<String, Vec<String>>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map holding only a status line such as `HTTP/1.1 200 OK`.
    pub fn with_status_line(line: impl Into<String>) -> Self {
        let mut headers = Self::new();
        headers.insert(STATUS_LINE, line);
        headers
    }

    /// Parse a raw HTTP/1.x response head.
    ///
    /// The first line is the status line; following `Name: value` lines are
    /// fields. Parsing stops at the first blank line and lines without a
    /// colon are skipped.
    pub fn parse(raw: &str) -> Self {
        let mut headers = Self::new();
        let mut lines = raw.lines();

        if let Some(status) = lines.next() {
            let status = status.trim();
            if !status.is_empty() {
                headers.insert(STATUS_LINE, status);
            }
        }

        for line in lines {
            if line.trim().is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                let name = name.trim();
                if !name.is_empty() {
                    headers.insert(name, value.trim());
                }
            }
        }

        headers
    }

    /// Collect the status line and header fields of a reqwest response.
    #[cfg(feature = "fetch")]
    pub fn from_response(response: &reqwest::Response) -> Self {
        let mut headers = Self::with_status_line(format!("{:?} {}", response.version(), response.status()));

        for (name, value) in response.headers() {
            headers.insert(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }

        headers
    }

    /// Append a value for `name`.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.fields.entry(name.to_ascii_lowercase()).or_default().push(value.into());
    }

    /// All values for `name`, in received order.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.fields.get(&name.to_ascii_lowercase()).map(Vec::as_slice)
    }

    /// The first value for `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)?.first().map(String::as_str)
    }

    pub fn status_line(&self) -> Option<&str> {
        self.first(STATUS_LINE)
    }

    pub fn location(&self) -> Option<&str> {
        self.first("location")
    }

    /// Every `Content-Type` value received, in order.
    pub fn content_type(&self) -> Option<&[String]> {
        self.get("content-type")
    }

    /// Number of distinct names, the status line included.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name.as_ref(), value);
        }
        headers
    }
}

/// Extract the numeric status code from the status line.
///
/// Returns `None` when there is no status line or its code is not a number.
pub fn get_status_code(headers: &Headers) -> Option<u16> {
    headers.status_line()?.split_whitespace().nth(1)?.parse().ok()
}

/// Whether the status code is in the 3xx range.
pub fn is_redirect(headers: &Headers) -> bool {
    matches!(get_status_code(headers), Some(300..=399))
}

/// Whether the response declares a `text/html` body.
///
/// Compares the media type only, ignoring case and any parameters such as
/// `charset`.
pub fn is_html(headers: &Headers) -> bool {
    headers.content_type().is_some_and(|values| {
        values.iter().any(|value| {
            value
                .split(';')
                .next()
                .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case("text/html"))
        })
    })
}
