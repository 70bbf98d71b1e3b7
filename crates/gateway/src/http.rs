//! reqwest-backed transport to the name-gender service.

use async_trait::async_trait;
use std::time::Duration;

use genderize_core::{traits::Transport, Error, Result};

/// HTTP transport for the remote service.
///
/// Client errors (4xx) come back as bodies because the service reports
/// invalid keys and exhausted quotas as JSON payloads. Connection
/// failures and server errors (5xx) are transport errors.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("genderize/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Request failed: {}", e)))?;

        let status = resp.status();
        if status.is_server_error() {
            return Err(Error::transport(format!("Service returned {}", status)));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response body: {}", e)))?;

        tracing::debug!(status = %status, bytes = body.len(), "Service responded");
        Ok(body)
    }
}
