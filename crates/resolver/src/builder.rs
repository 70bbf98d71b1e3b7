//! Builder for Resolver.

use secrecy::Secret;
use std::sync::Arc;
use std::time::Duration;

use genderize_core::{
    config::{
        AppConfig, DEFAULT_ENDPOINT, DEFAULT_MAX_NAMES_PER_REQUEST, DEFAULT_MAX_URL_LENGTH,
        DEFAULT_STREAM_WINDOW,
    },
    traits::{NameCache, Transport},
    Result,
};
use genderize_gateway::{HttpTransport, UrlBatcher};
use genderize_store::{InMemoryNameCache, SqliteNameCache};

use crate::dictionary::Dictionary;
use crate::engine::Resolver;

/// Builder for constructing a Resolver.
pub struct ResolverBuilder {
    transport: Option<Arc<dyn Transport>>,
    cache: Option<Arc<dyn NameCache>>,
    dictionary: Option<Dictionary>,
    endpoint: String,
    api_key: Option<Secret<String>>,
    max_names_per_request: usize,
    max_url_length: usize,
    timeout: Duration,
    stream_window: usize,
}

impl ResolverBuilder {
    /// Create a new builder with default settings: no cache, no dictionary,
    /// HTTP transport to the public endpoint.
    pub fn new() -> Self {
        Self {
            transport: None,
            cache: None,
            dictionary: None,
            endpoint: DEFAULT_ENDPOINT.into(),
            api_key: None,
            max_names_per_request: DEFAULT_MAX_NAMES_PER_REQUEST,
            max_url_length: DEFAULT_MAX_URL_LENGTH,
            timeout: Duration::from_secs(10),
            stream_window: DEFAULT_STREAM_WINDOW,
        }
    }

    /// Apply service and resolver settings from configuration.
    ///
    /// Does not open a cache or load a dictionary; see [`Self::configure`].
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.endpoint = config.service.endpoint.clone();
        self.api_key = config.service.api_key.clone();
        self.max_names_per_request = config.service.max_names_per_request;
        self.max_url_length = config.service.max_url_length;
        self.timeout = Duration::from_millis(config.service.timeout_ms);
        self.stream_window = config.resolver.stream_window;
        self
    }

    /// Build a fully wired builder from configuration: settings, cache
    /// store and dictionary.
    pub async fn configure(config: &AppConfig) -> Result<Self> {
        let mut builder = Self::new().with_config(config);

        if config.cache.enabled {
            let cache: Arc<dyn NameCache> = match &config.cache.path {
                Some(path) => {
                    tracing::info!(path = %path.display(), "Initializing SQLite name cache");
                    Arc::new(SqliteNameCache::open(path)?)
                }
                None => {
                    tracing::info!("Initializing in-memory name cache");
                    Arc::new(InMemoryNameCache::new())
                }
            };
            builder = builder.with_cache(cache);
        }

        if config.dictionary.enabled {
            let dictionary = match &config.dictionary.path {
                Some(path) => Dictionary::load(path).await?,
                None => Dictionary::bundled()?,
            };
            tracing::info!(entries = dictionary.len(), "Dictionary initialized");
            builder = builder.with_dictionary(dictionary);
        }

        Ok(builder)
    }

    /// Set the transport (defaults to [`HttpTransport`]).
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the write-through cache.
    pub fn with_cache(mut self, cache: Arc<dyn NameCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the static dictionary.
    pub fn with_dictionary(mut self, dictionary: Dictionary) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    /// Set the service endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the API key appended to every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    /// Set the per-request name limit.
    pub fn with_max_names_per_request(mut self, max: usize) -> Self {
        self.max_names_per_request = max;
        self
    }

    /// Set the request URL length limit.
    pub fn with_max_url_length(mut self, max: usize) -> Self {
        self.max_url_length = max;
        self
    }

    /// Set how many input names are held in memory at once.
    pub fn with_stream_window(mut self, window: usize) -> Self {
        self.stream_window = window;
        self
    }

    /// Build the Resolver.
    pub fn build(self) -> Result<Resolver> {
        let batcher = UrlBatcher::new(self.endpoint)?
            .with_max_names(self.max_names_per_request)
            .with_max_url_length(self.max_url_length);

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(self.timeout)?),
        };

        Ok(Resolver {
            transport,
            cache: self.cache,
            dictionary: self.dictionary,
            // A window must fit at least one full request.
            stream_window: self.stream_window.max(batcher.max_names()),
            batcher,
            api_key: self.api_key,
        })
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genderize_core::config::CacheConfig;
    use genderize_core::mocks::MockTransport;

    #[tokio::test]
    async fn test_configure_defaults() {
        let config = AppConfig::default();
        let resolver = ResolverBuilder::configure(&config)
            .await
            .unwrap()
            .with_transport(Arc::new(MockTransport::new(vec![])))
            .build()
            .unwrap();

        assert!(resolver.cache().is_some());
        assert!(resolver.dictionary().is_some());
        assert_eq!(resolver.dictionary_lookup("kasper").map(|g| g.as_str()), Some("male"));
    }

    #[tokio::test]
    async fn test_configure_sqlite_cache_and_no_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.cache = CacheConfig {
            enabled: true,
            path: Some(dir.path().join("cache.sqlite3")),
        };
        config.dictionary.enabled = false;

        let resolver = ResolverBuilder::configure(&config)
            .await
            .unwrap()
            .with_transport(Arc::new(MockTransport::new(vec![])))
            .build()
            .unwrap();

        assert!(resolver.dictionary().is_none());
        assert!(resolver.cache().unwrap().is_empty().await.unwrap());
        assert!(dir.path().join("cache.sqlite3").exists());
    }

    #[test]
    fn test_invalid_endpoint_fails_build() {
        let result = ResolverBuilder::new()
            .with_endpoint("::not a url::")
            .with_transport(Arc::new(MockTransport::new(vec![])))
            .build();
        assert!(result.is_err());
    }
}
