//! Async HTTP client wrapping reqwest.
//!
//! Every request is bounded by the configured timeout; expiry is reported as
//! a transport failure like any other network error.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use local_server_core::FetchConfig;
use tracing::debug;

use super::{Fetch, ProviderError};

/// HTTP client used by the image providers.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client with the configured timeout and user-agent.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client, timeout })
    }

    fn transport_error(&self, url: &str, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Transport(format!(
                "request to {url:?} timed out after {}ms",
                self.timeout.as_millis()
            ))
        } else {
            ProviderError::Transport(format!("Can't get response from {url:?}: {err}"))
        }
    }
}

#[async_trait]
impl Fetch for HttpClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        debug!("GET {url}");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.transport_error(url, e))?;

        let body = resp.bytes().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(url, e)
            } else {
                ProviderError::Transport(format!("Can't read response from {url:?}: {e}"))
            }
        })?;

        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_creation() {
        let client = HttpClient::new(&FetchConfig::default()).unwrap();
        assert_eq!(client.timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let config = FetchConfig {
            timeout_ms: 500,
            ..FetchConfig::default()
        };
        let client = HttpClient::new(&config).unwrap();
        // Bind then drop to get a loopback port nothing listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let err = client
            .fetch(&format!("http://127.0.0.1:{port}/"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
    }
}
