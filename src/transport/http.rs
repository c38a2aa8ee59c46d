use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Proxy;

use super::{TransportFailure, TransportKind, TransportStrategy};

/// Plain HTTP GET transport.
#[derive(Debug, Clone)]
pub struct DirectTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl DirectTransport {
    /// Builds the HTTP client. `proxy_url` is ignored when it does not parse.
    pub fn new(timeout: Duration, proxy_url: Option<&str>) -> Result<Self, TransportFailure> {
        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wsdot-client/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(
                env::var("WSDOT_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(8),
            );

        if let Some(proxy_url) = proxy_url {
            match Proxy::all(proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => tracing::warn!(error = %e, "ignoring invalid proxy url"),
            }
        }

        let client = builder.build().map_err(|e| TransportFailure::Http(e.without_url()))?;
        Ok(Self { client, timeout })
    }

    /// Wraps an existing client.
    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn map_send_error(&self, e: reqwest::Error) -> TransportFailure {
        // reqwest errors embed the URL, which carries the access code
        if e.is_timeout() {
            TransportFailure::Timeout {
                after: self.timeout,
            }
        } else {
            TransportFailure::Http(e.without_url())
        }
    }
}

#[async_trait]
impl TransportStrategy for DirectTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Direct
    }

    async fn fetch(&self, url: &str) -> Result<String, TransportFailure> {
        let response = self
            .client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportFailure::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        if body.trim().is_empty() {
            return Err(TransportFailure::EmptyBody);
        }
        Ok(body)
    }
}
