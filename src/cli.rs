use clap::Parser;
use std::path::PathBuf;

use genderize_core::config::AppConfig;
use secrecy::Secret;

#[derive(Parser, Debug)]
#[command(name = "genderize")]
#[command(about = "Resolve first names to genders")]
#[command(version)]
pub struct Cli {
    /// Names to resolve (read one per line from stdin if omitted)
    pub names: Vec<String>,

    /// Configuration file, replacing the config/ directory lookup
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// API key for the genderize service
    #[arg(long, env = "GENDERIZE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// SQLite cache file
    #[arg(long, value_name = "PATH", conflicts_with = "no_cache")]
    pub cache: Option<PathBuf>,

    /// Disable the name cache
    #[arg(long)]
    pub no_cache: bool,

    /// Disable the static dictionary
    #[arg(long)]
    pub no_dictionary: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// Fold command line flags over loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(key) = &self.api_key {
            config.service.api_key = Some(Secret::new(key.clone()));
        }
        if let Some(path) = &self.cache {
            config.cache.enabled = true;
            config.cache.path = Some(path.clone());
        }
        if self.no_cache {
            config.cache.enabled = false;
        }
        if self.no_dictionary {
            config.dictionary.enabled = false;
        }
        config.logging.json_logs |= self.json_logs;
        config.logging.debug |= self.debug;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "genderize",
            "--api-key",
            "1234",
            "--cache",
            "names.sqlite3",
            "--no-dictionary",
            "kasper",
            "christina",
        ]);
        let mut config = AppConfig::default();
        cli.apply(&mut config);

        assert_eq!(cli.names, vec!["kasper", "christina"]);
        assert_eq!(config.service.api_key.unwrap().expose_secret(), "1234");
        assert_eq!(config.cache.path, Some(PathBuf::from("names.sqlite3")));
        assert!(config.cache.enabled);
        assert!(!config.dictionary.enabled);
    }

    #[test]
    fn test_no_cache_conflicts_with_cache_path() {
        let result = Cli::try_parse_from(["genderize", "--cache", "x.db", "--no-cache"]);
        assert!(result.is_err());
    }
}
