use async_trait::async_trait;

use crate::error::Result;

/// Fetches raw response bodies from the name-gender service.
///
/// Implementations return the body for any response the service produced
/// (including JSON error payloads) and `Error::Transport` when no usable
/// response was received.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET for `url` and return the response body.
    async fn fetch(&self, url: &str) -> Result<String>;
}
