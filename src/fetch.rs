//! Stylesheet fetching used when a sheet's rules cannot be read directly.

use crate::{Error, Result};
use futures::future::BoxFuture;

#[cfg(feature = "http")]
use crate::ExporterConfig;
#[cfg(feature = "http")]
use reqwest::Client;
#[cfg(feature = "http")]
use std::time::Duration;

/// Source of raw stylesheet text for sheets whose rules are inaccessible
pub trait StylesheetFetcher: Send + Sync {
    /// Fetch the body of the stylesheet at `url`
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String>>;
}

/// HTTP fetcher backed by an async `reqwest` client
#[cfg(feature = "http")]
pub struct HttpFetcher {
    client: Client,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    pub fn new(config: &ExporterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::NetworkError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "http")]
impl StylesheetFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let resp = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| Error::NetworkError(format!("Failed to fetch {}: {}", url, e)))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(Error::NetworkError(format!("{} returned {}", url, status)));
            }

            resp.text()
                .await
                .map_err(|e| Error::NetworkError(format!("Failed to read {}: {}", url, e)))
        })
    }
}

/// Fetcher that never touches the network; every request fails.
pub struct NoopFetcher;

impl NoopFetcher {
    pub fn new() -> Self {
        NoopFetcher
    }
}

impl Default for NoopFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl StylesheetFetcher for NoopFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move { Err(Error::NetworkError(format!("offline, not fetching {}", url))) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_fetcher_always_fails() {
        let f = NoopFetcher::new();
        let err = f.fetch("https://example.com/a.css").await.unwrap_err();
        assert!(matches!(err, Error::NetworkError(_)));
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn http_fetcher_reads_body_and_rejects_errors() {
        // Skip on CI where network may not be available
        if std::env::var("CI").is_ok() {
            return;
        }

        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr();
        std::thread::spawn(move || {
            for _ in 0..2 {
                if let Ok(request) = server.recv() {
                    let response = if request.url() == "/ok.css" {
                        tiny_http::Response::from_string("p{margin:0}")
                    } else {
                        tiny_http::Response::from_string("missing").with_status_code(404)
                    };
                    let _ = request.respond(response);
                }
            }
        });

        let fetcher = HttpFetcher::new(&ExporterConfig::default()).unwrap();
        let body = fetcher.fetch(&format!("http://{}/ok.css", addr)).await.unwrap();
        assert_eq!(body, "p{margin:0}");

        let err = fetcher
            .fetch(&format!("http://{}/gone.css", addr))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NetworkError(_)));
    }
}
