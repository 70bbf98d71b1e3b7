use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default genderize.io endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.genderize.io/";

/// Names the service accepts in a single request.
pub const DEFAULT_MAX_NAMES_PER_REQUEST: usize = 10;

/// Upper bound on a rendered request URL, in bytes.
pub const DEFAULT_MAX_URL_LENGTH: usize = 2000;

/// Names the streaming engine holds in memory at once.
pub const DEFAULT_STREAM_WINDOW: usize = 100;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub cache: CacheConfig,
    pub dictionary: DictionaryConfig,
    pub resolver: ResolverConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub api_key: Option<Secret<String>>,
    pub max_names_per_request: usize,
    pub max_url_length: usize,
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            api_key: None,
            max_names_per_request: DEFAULT_MAX_NAMES_PER_REQUEST,
            max_url_length: DEFAULT_MAX_URL_LENGTH,
            timeout_ms: 10_000,
        }
    }
}

/// Persistent cache settings. Enabled without a path means an in-memory
/// cache scoped to the process.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

/// Static dictionary settings. Without a path the bundled data file is used.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    pub enabled: bool,
    pub path: Option<PathBuf>,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ResolverConfig {
    pub stream_window: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            stream_window: DEFAULT_STREAM_WINDOW,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub debug: bool,
    pub json_logs: bool,
}

impl AppConfig {
    /// Load layered configuration from the `config/` directory and the
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("GENDERIZE_ENV").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Map GENDERIZE__SERVICE__API_KEY=abc to service.api_key
            .add_source(Environment::with_prefix("GENDERIZE").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Load configuration from an explicit file, still honouring
    /// environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("GENDERIZE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
