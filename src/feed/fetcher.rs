use crate::feed::discovery::find_feed_link;
use crate::feed::parser::{parse_feed, ParseError, ParsedFeed};
use futures::StreamExt;
use thiserror::Error;
use tokio::time::{timeout_at, Instant};
use url::Url;

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Client identifier sent with every request.
pub const USER_AGENT: &str = concat!("feedriver/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while fetching a single feed target.
///
/// All of these are per-target: the aggregator reports them and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// The shared fetch-phase deadline elapsed mid-request
    #[error("fetch deadline elapsed")]
    DeadlineExceeded,
    /// Content is not a parseable feed and no discoverable feed link exists
    #[error("not a feed: no RSS/Atom content found")]
    NotAFeed,
    /// Recognized feed type with unreadable content
    #[error("malformed feed: {0}")]
    Malformed(String),
    /// Response body exceeded the 10MB size limit
    #[error("response too large")]
    ResponseTooLarge,
}

/// A successfully fetched and parsed feed.
///
/// `endpoint` is the URL that was actually fetched — the discovered URL when
/// auto-discovery occurred, not necessarily the one the user supplied.
#[derive(Debug)]
pub struct FetchedFeed {
    pub endpoint: Url,
    pub feed: ParsedFeed,
}

/// Builds the HTTP client shared by all fetch tasks.
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().user_agent(USER_AGENT).build()
}

/// Fetches one feed target under a shared deadline, with one discovery hop.
///
/// Performs a single GET and parses the body as a feed. If the body is not a
/// recognized feed type, scans it for an advertised RSS/Atom `<link>` and
/// fetches that URL once under the same deadline; a second unrecognized body
/// (or no advertised link) fails with [`FetchError::NotAFeed`]. Discovery
/// never recurses further.
///
/// # Errors
///
/// - [`FetchError::Network`] - connection, DNS, or TLS failure
/// - [`FetchError::HttpStatus`] - non-2xx response
/// - [`FetchError::DeadlineExceeded`] - the fetch-phase deadline elapsed
/// - [`FetchError::NotAFeed`] - no parseable feed and no discoverable link
/// - [`FetchError::Malformed`] - recognized feed type with unreadable content
/// - [`FetchError::ResponseTooLarge`] - body exceeded the size limit
pub async fn fetch_feed(
    client: &reqwest::Client,
    target: &Url,
    deadline: Instant,
) -> Result<FetchedFeed, FetchError> {
    let body = fetch_bytes(client, target.clone(), deadline).await?;
    match parse_feed(&body) {
        Ok(feed) => {
            return Ok(FetchedFeed {
                endpoint: target.clone(),
                feed,
            })
        }
        Err(ParseError::Malformed(detail)) => return Err(FetchError::Malformed(detail)),
        Err(ParseError::NotAFeed) => {}
    }

    // The body may be an HTML page advertising its feed; follow that once.
    let html = String::from_utf8_lossy(&body);
    let discovered = find_feed_link(&html, target).ok_or(FetchError::NotAFeed)?;
    tracing::debug!(page = %target, feed = %discovered, "following discovered feed link");

    let body = fetch_bytes(client, discovered.clone(), deadline).await?;
    match parse_feed(&body) {
        Ok(feed) => Ok(FetchedFeed {
            endpoint: discovered,
            feed,
        }),
        Err(ParseError::NotAFeed) => Err(FetchError::NotAFeed),
        Err(ParseError::Malformed(detail)) => Err(FetchError::Malformed(detail)),
    }
}

async fn fetch_bytes(
    client: &reqwest::Client,
    url: Url,
    deadline: Instant,
) -> Result<Vec<u8>, FetchError> {
    let response = timeout_at(deadline, client.get(url).send())
        .await
        .map_err(|_| FetchError::DeadlineExceeded)??;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    timeout_at(deadline, read_limited_bytes(response, MAX_FEED_SIZE))
        .await
        .map_err(|_| FetchError::DeadlineExceeded)?
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Test Feed</title>
    <item>
      <title>Post</title>
      <link>https://example.com/post</link>
      <pubDate>Mon, 01 May 2023 00:00:00 GMT</pubDate>
    </item>
</channel></rss>"#;

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(30)
    }

    fn target(server: &MockServer, p: &str) -> Url {
        Url::parse(&format!("{}{}", server.uri(), p)).unwrap()
    }

    #[tokio::test]
    async fn fetches_and_parses_a_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
            .mount(&server)
            .await;

        let url = target(&server, "/feed.xml");
        let fetched = fetch_feed(&http_client().unwrap(), &url, far_deadline())
            .await
            .unwrap();

        assert_eq!(fetched.endpoint, url);
        assert_eq!(fetched.feed.title, "Test Feed");
        assert_eq!(fetched.feed.entries.len(), 1);
    }

    #[tokio::test]
    async fn non_2xx_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = target(&server, "/feed.xml");
        let err = fetch_feed(&http_client().unwrap(), &url, far_deadline())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus(404)));
    }

    #[tokio::test]
    async fn connection_failure_is_a_network_error() {
        // Nothing is listening on this port
        let url = Url::parse("http://127.0.0.1:1/feed.xml").unwrap();
        let err = fetch_feed(&http_client().unwrap(), &url, far_deadline())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }

    #[tokio::test]
    async fn elapsed_deadline_abandons_the_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let url = target(&server, "/feed.xml");
        let deadline = Instant::now() + Duration::from_millis(50);
        let err = fetch_feed(&http_client().unwrap(), &url, deadline)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn discovers_feed_link_from_html_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><head><link type="application/rss+xml" href="/feed.xml"></head></html>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
            .mount(&server)
            .await;

        let page = target(&server, "/");
        let fetched = fetch_feed(&http_client().unwrap(), &page, far_deadline())
            .await
            .unwrap();

        // The endpoint records the discovered URL, not the page the user gave
        assert_eq!(fetched.endpoint, target(&server, "/feed.xml"));
        assert_eq!(fetched.feed.title, "Test Feed");
    }

    #[tokio::test]
    async fn discovery_stops_after_one_hop() {
        let server = MockServer::start().await;
        // The discovered URL is itself another HTML page with a feed link;
        // no second discovery hop may happen.
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><head><link type="application/rss+xml" href="/feed.xml"></head></html>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><head><link type="application/rss+xml" href="/other.xml"></head></html>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/other.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
            .expect(0)
            .mount(&server)
            .await;

        let page = target(&server, "/");
        let err = fetch_feed(&http_client().unwrap(), &page, far_deadline())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NotAFeed));
    }

    #[tokio::test]
    async fn html_without_feed_link_is_not_a_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>Just a page</body></html>"),
            )
            .mount(&server)
            .await;

        let url = target(&server, "/page");
        let err = fetch_feed(&http_client().unwrap(), &url, far_deadline())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NotAFeed));
    }

    #[tokio::test]
    async fn corrupt_feed_is_malformed_and_skips_discovery() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<?xml version=\"1.0\"?><rss version=\"2.0\"><channel><item>"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let url = target(&server, "/feed.xml");
        let err = fetch_feed(&http_client().unwrap(), &url, far_deadline())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }
}
