// src/transport.rs
// =============================================================================
// The network capability every stage of the crawl shares.
//
// One HttpTransport (and therefore one reqwest connection pool) is created in
// main and handed to the crawler as Arc<dyn Transport>. Nothing reaches for a
// global client. Tests can swap in their own implementation.
//
// Every call races three things:
// - the request itself
// - a deadline (tokio::time::timeout, on top of reqwest's own timeout)
// - a CancellationToken, so Ctrl-C unblocks every in-flight request
//
// fetch() looks at the Content-Type header before touching the body. A PDF or
// a zip found while crawling is never downloaded, only its headers are read.
//
// Rust concepts:
// - Traits as injectable capabilities (dyn Transport)
// - async-trait: async methods on object-safe traits
// - tokio::select!: wait on whichever future finishes first
// =============================================================================

use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A fetched page: status code, declared content type and raw body bytes
#[derive(Debug, Clone)]
pub struct Page {
    pub status: u16,
    pub content_type: Option<String>,
    /// Left empty when the content type says the page has no markup
    pub body: Vec<u8>,
}

impl Page {
    /// Whether the body may hold <a href> links
    pub fn has_markup(&self) -> bool {
        is_markup(self.content_type.as_deref())
    }
}

// Missing headers get the benefit of the doubt; any text/* or *html / *xml
// type is read. Everything else (application/pdf, image/png, ...) is not.
fn is_markup(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return true;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime.is_empty() || mime.starts_with("text/") || mime.contains("html") || mime.contains("xml")
}

/// Issues GET requests on behalf of the crawler
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and read the whole body, unless it is not markup
    async fn fetch(&self, url: &Url, cancel: &CancellationToken) -> Result<Page, FetchError>;

    /// GET `url` and return only the status code, leaving the body unread
    async fn status(&self, url: &Url, cancel: &CancellationToken) -> Result<u16, FetchError>;
}

/// Parses a link into a requestable URL
///
/// This is the "construction" step: anything that is not an absolute
/// http(s) URL fails here, before any network traffic happens.
pub fn build_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw).map_err(|source| FetchError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(FetchError::UnsupportedScheme {
            url: raw.to_string(),
            scheme: scheme.to_string(),
        }),
    }
}

/// Production transport backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Builds the shared client
    ///
    /// Redirects are followed (up to 5), so a checked link reports the status
    /// of its final destination.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, timeout })
    }

    // Runs one request future under the deadline and the cancellation token
    async fn guarded<T, F>(&self, url: &Url, cancel: &CancellationToken, request: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, reqwest::Error>>,
    {
        tokio::select! {
            _ = cancel.cancelled() => Err(FetchError::Cancelled {
                url: url.to_string(),
            }),
            result = tokio::time::timeout(self.timeout, request) => match result {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) if e.is_timeout() => Err(FetchError::Timeout {
                    url: url.to_string(),
                    timeout: self.timeout,
                }),
                Ok(Err(e)) => Err(FetchError::Transport {
                    url: url.to_string(),
                    source: e,
                }),
                Err(_elapsed) => Err(FetchError::Timeout {
                    url: url.to_string(),
                    timeout: self.timeout,
                }),
            },
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url, cancel: &CancellationToken) -> Result<Page, FetchError> {
        let request = async {
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);

            // Dropping the response unread closes the connection early
            if !is_markup(content_type.as_deref()) {
                return Ok(Page {
                    status,
                    content_type,
                    body: Vec::new(),
                });
            }

            let body = response.bytes().await?;
            Ok(Page {
                status,
                content_type,
                body: body.to_vec(),
            })
        };

        self.guarded(url, cancel, request).await
    }

    async fn status(&self, url: &Url, cancel: &CancellationToken) -> Result<u16, FetchError> {
        let request = async {
            let response = self.client.get(url.clone()).send().await?;
            Ok(response.status().as_u16())
        };

        self.guarded(url, cancel, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(timeout: Duration) -> HttpTransport {
        HttpTransport::new(timeout, "crawler-test").unwrap()
    }

    #[test]
    fn test_build_url_accepts_http() {
        assert!(build_url("https://example.com/a").is_ok());
        assert!(build_url("http://127.0.0.1:8080").is_ok());
    }

    #[test]
    fn test_build_url_rejects_bare_address() {
        let err = build_url("x@y.com").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[test]
    fn test_build_url_rejects_other_schemes() {
        let err = build_url("javascript:void(0)").unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme { ref scheme, .. } if scheme == "javascript"));
    }

    #[tokio::test]
    async fn test_fetch_reads_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>hi</p>"))
            .mount(&server)
            .await;

        let url = build_url(&format!("{}/page", server.uri())).unwrap();
        let page = transport(Duration::from_secs(5))
            .fetch(&url, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.body, b"<p>hi</p>");
    }

    #[tokio::test]
    async fn test_fetch_skips_body_that_is_not_markup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/report.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(vec![0x25, 0x50, 0x44, 0x46, 0xff, 0xfe]),
            )
            .mount(&server)
            .await;

        let url = build_url(&format!("{}/report.pdf", server.uri())).unwrap();
        let page = transport(Duration::from_secs(5))
            .fetch(&url, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.content_type.as_deref(), Some("application/pdf"));
        assert!(!page.has_markup());
        assert!(page.body.is_empty());
    }

    #[test]
    fn test_markup_content_types() {
        assert!(is_markup(None));
        assert!(is_markup(Some("text/html; charset=UTF-8")));
        assert!(is_markup(Some("text/plain")));
        assert!(is_markup(Some("application/xhtml+xml")));
        assert!(!is_markup(Some("application/pdf")));
        assert!(!is_markup(Some("image/png")));
        assert!(!is_markup(Some("application/zip")));
    }

    #[tokio::test]
    async fn test_status_reports_not_found() {
        let server = MockServer::start().await;

        let url = build_url(&format!("{}/missing", server.uri())).unwrap();
        let status = transport(Duration::from_secs(5))
            .status(&url, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 1 is reserved and nothing listens there
        let url = build_url("http://127.0.0.1:1/").unwrap();
        let err = transport(Duration::from_secs(5))
            .status(&url, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Transport { .. } | FetchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let url = build_url(&server.uri()).unwrap();
        let err = transport(Duration::from_millis(200))
            .status(&url, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_cancelled_request_returns_promptly() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();

        let url = build_url(&server.uri()).unwrap();
        let err = transport(Duration::from_secs(30))
            .status(&url, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Cancelled { .. }));
    }
}
