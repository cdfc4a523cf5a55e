//! Document retrieval with bounded redirect following.
//!
//! The fetcher issues one request at a time and decides what to do next
//! purely from the status line and headers of each response. The HTTP
//! client never follows redirects itself; every hop is taken here and paid
//! for from the caller's redirect budget.
//!
//! Reaching a `200` response with a `text/html` body yields the document.
//! Every other ending (non-HTML content, an error status, a redirect with
//! no `Location`, or an exhausted budget) is an ordinary [`FetchOutcome`],
//! not an error. Errors are reserved for bad URLs and broken transports.
//!
//! Local files and stdin are also supported for the CLI.

use std::fmt;
use std::fs;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Client, redirect};
use tracing::{debug, info};
use url::Url;

use crate::headers::{Headers, get_status_code, is_html, is_redirect};
use crate::{Result, StripError};

/// Redirect budget used by [`fetch_html`].
pub const DEFAULT_REDIRECTS: i32 = 3;

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
    /// Redirects to follow after the first request. Negative values act as zero.
    pub redirects: i32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (compatible; htmlstrip/0.1)".to_string(),
            redirects: DEFAULT_REDIRECTS,
        }
    }
}

/// One request/response exchange as seen by the fetcher.
pub trait Exchange: Send {
    /// Status line and header fields of the response.
    fn headers(&self) -> &Headers;

    /// Read the response body as text.
    fn into_body(self) -> impl Future<Output = Result<String>> + Send;
}

/// Issues single HTTP requests without following redirects.
pub trait Transport: Sync {
    type Exchange: Exchange;

    fn request(&self, url: &Url) -> impl Future<Output = Result<Self::Exchange>> + Send;
}

/// [`Transport`] backed by a reqwest client with redirects disabled.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: u64,
}

impl HttpTransport {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.as_str())
            .redirect(redirect::Policy::none())
            .build()
            .map_err(StripError::HttpError)?;

        Ok(Self { client, timeout: config.timeout })
    }
}

/// A response whose body has not been read yet.
#[derive(Debug)]
pub struct HttpExchange {
    headers: Headers,
    response: reqwest::Response,
    timeout: u64,
}

impl Exchange for HttpExchange {
    fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Read the body as UTF-8 whatever charset the response declares.
    async fn into_body(self) -> Result<String> {
        let timeout = self.timeout;
        let bytes = self.response.bytes().await.map_err(|e| request_error(e, timeout))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Transport for HttpTransport {
    type Exchange = HttpExchange;

    async fn request(&self, url: &Url) -> Result<HttpExchange> {
        let response = self
            .client
            .get(url.clone())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| request_error(e, self.timeout))?;

        let headers = Headers::from_response(&response);
        Ok(HttpExchange { headers, response, timeout: self.timeout })
    }
}

fn request_error(err: reqwest::Error, timeout: u64) -> StripError {
    if err.is_timeout() { StripError::Timeout { timeout } } else { StripError::HttpError(err) }
}

/// A successfully fetched HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// URL the document was finally served from.
    pub url: String,
    /// Redirects followed to get there.
    pub redirects: u32,
    /// Document text, lines joined with `\n`.
    pub html: String,
}

/// How a fetch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// `200` with a `text/html` body.
    Html(Fetched),
    /// `200` with some other content type.
    NotHtml,
    /// A terminal status that is neither success nor redirect.
    Status(Option<u16>),
    /// A redirect without a `Location` header.
    MissingLocation,
    /// A `Location` that cannot be resolved against the current URL.
    InvalidLocation(String),
    /// A redirect offered after the budget ran out.
    RedirectLimit,
}

impl FetchOutcome {
    /// The document text, if the fetch succeeded.
    pub fn into_html(self) -> Option<String> {
        match self {
            Self::Html(fetched) => Some(fetched.html),
            _ => None,
        }
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html(fetched) => write!(f, "HTML from {} after {} redirect(s)", fetched.url, fetched.redirects),
            Self::NotHtml => write!(f, "response is not HTML"),
            Self::Status(Some(code)) => write!(f, "unexpected status {code}"),
            Self::Status(None) => write!(f, "missing or malformed status line"),
            Self::MissingLocation => write!(f, "redirect without a Location header"),
            Self::InvalidLocation(location) => write!(f, "invalid redirect location: {location}"),
            Self::RedirectLimit => write!(f, "redirect limit reached"),
        }
    }
}

/// Parse an absolute http or https URL.
pub fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| StripError::InvalidUrl(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(StripError::InvalidUrl(format!(
            "{url}: unsupported scheme {scheme:?} (expected http or https)"
        ))),
    }
}

/// Run the redirect state machine against `transport`.
///
/// The first request is always issued. Each redirect followed afterwards
/// consumes one unit of `redirects`; a redirect offered with no budget left
/// ends the fetch with [`FetchOutcome::RedirectLimit`]. Negative budgets
/// follow no redirects. Redirect cycles end through the budget.
pub async fn fetch_outcome<T: Transport>(transport: &T, url: &Url, redirects: i32) -> Result<FetchOutcome> {
    let budget = u32::try_from(redirects).unwrap_or(0);
    let mut remaining = budget;
    let mut current = url.clone();

    loop {
        debug!(url = %current, remaining, "requesting");

        let exchange = transport.request(&current).await?;
        let headers = exchange.headers();
        let status = get_status_code(headers);

        let outcome = match status {
            Some(200) if is_html(headers) => {
                let body = exchange.into_body().await?;
                debug!(url = %current, bytes = body.len(), "fetched html");

                return Ok(FetchOutcome::Html(Fetched {
                    url: current.to_string(),
                    redirects: budget - remaining,
                    html: join_lines(&body),
                }));
            }
            Some(200) => FetchOutcome::NotHtml,
            _ if is_redirect(headers) => match headers.location() {
                None => FetchOutcome::MissingLocation,
                Some(_) if remaining == 0 => FetchOutcome::RedirectLimit,
                Some(location) => match current.join(location) {
                    Ok(next) => {
                        debug!(from = %current, to = %next, status = ?status, "following redirect");
                        remaining -= 1;
                        current = next;
                        continue;
                    }
                    Err(_) => FetchOutcome::InvalidLocation(location.to_string()),
                },
            },
            code => FetchOutcome::Status(code),
        };

        info!(url = %current, status = ?status, %outcome, "no html fetched");
        return Ok(outcome);
    }
}

/// Fetch a URL over HTTP, following at most `config.redirects` redirects.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<FetchOutcome> {
    let parsed = parse_url(url)?;
    let transport = HttpTransport::new(config)?;

    fetch_outcome(&transport, &parsed, config.redirects).await
}

/// Fetch the HTML at `url` with the default redirect budget.
///
/// Returns `Ok(None)` when the URL does not lead to an HTML document.
pub async fn fetch_html(url: &str) -> Result<Option<String>> {
    fetch_html_with_redirects(url, DEFAULT_REDIRECTS).await
}

/// Fetch the HTML at `url`, following at most `redirects` redirects.
///
/// Returns `Ok(None)` when the URL does not lead to an HTML document within
/// the budget.
pub async fn fetch_html_with_redirects(url: &str, redirects: i32) -> Result<Option<String>> {
    let config = FetchConfig { redirects, ..Default::default() };
    Ok(fetch_url(url, &config).await?.into_html())
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(StripError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(StripError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(StripError::from)?;

    Ok(buffer)
}

/// Lines of `body` joined with `\n`: CRLF folded, no trailing newline.
fn join_lines(body: &str) -> String {
    body.lines().collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const BASE: &str = "https://example.com";

    struct MockExchange {
        headers: Headers,
        body: String,
    }

    impl Exchange for MockExchange {
        fn headers(&self) -> &Headers {
            &self.headers
        }

        async fn into_body(self) -> Result<String> {
            Ok(self.body)
        }
    }

    #[derive(Default)]
    struct MockTransport {
        routes: HashMap<String, (Headers, String)>,
        requested: Mutex<Vec<String>>,
    }

    impl MockTransport {
        fn route(mut self, path: &str, head: &str, body: &str) -> Self {
            self.routes
                .insert(format!("{BASE}{path}"), (Headers::parse(head), body.to_string()));
            self
        }

        fn redirect(self, path: &str, location: &str) -> Self {
            let head = format!("HTTP/1.1 302 Found\nLocation: {location}\nContent-Type: text/html\n");
            self.route(path, &head, "")
        }

        fn requests(&self) -> usize {
            self.requested.lock().unwrap().len()
        }

        fn chain() -> Self {
            Self::default()
                .redirect("/redirect/one", "/redirect/two")
                .redirect("/redirect/two", "three")
                .redirect("/redirect/three", "https://example.com/simple/hello.html")
                .route(
                    "/simple/hello.html",
                    "HTTP/1.1 200 OK\nContent-Type: text/html; charset=utf-8\n",
                    "<p>Hello</p>\r\n<p>World</p>\r\n",
                )
        }
    }

    impl Transport for MockTransport {
        type Exchange = MockExchange;

        async fn request(&self, url: &Url) -> Result<MockExchange> {
            self.requested.lock().unwrap().push(url.to_string());

            let (headers, body) = self.routes.get(url.as_str()).cloned().ok_or_else(|| {
                StripError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    url.to_string(),
                ))
            })?;

            Ok(MockExchange { headers, body })
        }
    }

    fn url(path: &str) -> Url {
        Url::parse(&format!("{BASE}{path}")).unwrap()
    }

    #[rstest]
    #[case(3)]
    #[case(4)]
    #[case(100)]
    #[tokio::test]
    async fn test_redirect_within_budget(#[case] redirects: i32) {
        let transport = MockTransport::chain();
        let outcome = fetch_outcome(&transport, &url("/redirect/one"), redirects).await.unwrap();

        let FetchOutcome::Html(fetched) = outcome else {
            panic!("expected html, got {outcome:?}");
        };
        assert_eq!(fetched.html, "<p>Hello</p>\n<p>World</p>");
        assert_eq!(fetched.url, "https://example.com/simple/hello.html");
        assert_eq!(fetched.redirects, 3);
        assert_eq!(transport.requests(), 4);
    }

    #[rstest]
    #[case(-1)]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[tokio::test]
    async fn test_redirect_over_budget(#[case] redirects: i32) {
        let transport = MockTransport::chain();
        let outcome = fetch_outcome(&transport, &url("/redirect/one"), redirects).await.unwrap();

        assert_eq!(outcome, FetchOutcome::RedirectLimit);
        assert_eq!(transport.requests(), redirects.max(0) as usize + 1);
    }

    #[tokio::test]
    async fn test_redirect_loop_ends_through_budget() {
        let transport = MockTransport::default()
            .redirect("/loop1", "/loop2")
            .redirect("/loop2", "/loop1");
        let outcome = fetch_outcome(&transport, &url("/loop1"), 10).await.unwrap();

        assert_eq!(outcome, FetchOutcome::RedirectLimit);
        assert_eq!(transport.requests(), 11);
    }

    #[tokio::test]
    async fn test_self_redirect() {
        let transport = MockTransport::default().redirect("/self", "/self");
        let outcome = fetch_outcome(&transport, &url("/self"), 2).await.unwrap();

        assert_eq!(outcome, FetchOutcome::RedirectLimit);
        assert_eq!(transport.requests(), 3);
    }

    #[rstest]
    #[case::not_html("HTTP/1.1 200 OK\nContent-Type: text/plain\n", FetchOutcome::NotHtml)]
    #[case::no_content_type("HTTP/1.1 200 OK\n", FetchOutcome::NotHtml)]
    #[case::not_found("HTTP/1.1 404 Not Found\nContent-Type: text/html\n", FetchOutcome::Status(Some(404)))]
    #[case::gone("HTTP/1.1 410 Gone\nContent-Type: text/html\n", FetchOutcome::Status(Some(410)))]
    #[case::no_content("HTTP/1.1 204 No Content\nContent-Type: text/html\n", FetchOutcome::Status(Some(204)))]
    #[case::no_status("", FetchOutcome::Status(None))]
    #[case::no_location("HTTP/1.1 301 Moved Permanently\n", FetchOutcome::MissingLocation)]
    #[tokio::test]
    async fn test_terminal_failures(#[case] head: &str, #[case] expected: FetchOutcome) {
        let transport = MockTransport::default().route("/page", head, "<p>body</p>");
        let outcome = fetch_outcome(&transport, &url("/page"), 3).await.unwrap();

        assert_eq!(outcome, expected);
        assert!(outcome.clone().into_html().is_none());
        assert_eq!(transport.requests(), 1);
    }

    #[tokio::test]
    async fn test_invalid_location() {
        let transport = MockTransport::default().redirect("/bad", "http://[::1");
        let outcome = fetch_outcome(&transport, &url("/bad"), 3).await.unwrap();

        assert_eq!(outcome, FetchOutcome::InvalidLocation("http://[::1".to_string()));
    }

    #[tokio::test]
    async fn test_relative_location_resolution() {
        let transport = MockTransport::default()
            .redirect("/a/b/start", "../other/page.html")
            .route(
                "/a/other/page.html",
                "HTTP/1.1 200 OK\nContent-Type: text/html\n",
                "found",
            );
        let outcome = fetch_outcome(&transport, &url("/a/b/start"), 1).await.unwrap();

        assert_eq!(outcome.into_html().as_deref(), Some("found"));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let transport = MockTransport::default().redirect("/start", "/missing");
        let result = fetch_outcome(&transport, &url("/start"), 3).await;

        assert!(matches!(result, Err(StripError::Io(_))));
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert_eq!(config.redirects, DEFAULT_REDIRECTS);
        assert!(config.user_agent.contains("htmlstrip"));
    }

    #[rstest]
    #[case("not-a-url")]
    #[case("example.com")]
    #[case("ftp://example.com/file.html")]
    #[case("file:///etc/hosts")]
    fn test_parse_url_rejects(#[case] input: &str) {
        assert!(matches!(parse_url(input), Err(StripError::InvalidUrl(_))));
    }

    #[test]
    fn test_parse_url_accepts() {
        assert!(parse_url("http://example.com").is_ok());
        assert!(parse_url("https://example.com/path?q=1").is_ok());
    }

    #[tokio::test]
    async fn test_fetch_html_invalid_url() {
        let result = fetch_html("not-a-url").await;
        assert!(matches!(result, Err(StripError::InvalidUrl(_))));
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(StripError::FileNotFound(_))));
    }

    #[test]
    fn test_fetch_file_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<p>hi</p>").unwrap();

        assert_eq!(fetch_file(path.to_str().unwrap()).unwrap(), "<p>hi</p>");
    }

    #[rstest]
    #[case("a\r\nb\r\n", "a\nb")]
    #[case("a\nb", "a\nb")]
    #[case("a\n\n\nb\n", "a\n\n\nb")]
    #[case("", "")]
    fn test_join_lines(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(join_lines(body), expected);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(FetchOutcome::Status(Some(404)).to_string(), "unexpected status 404");
        assert_eq!(FetchOutcome::RedirectLimit.to_string(), "redirect limit reached");
    }
}
