//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Account address prefix used by the default address parser
    pub bech32_prefix: String,

    /// Number of block workers
    pub parser_workers: usize,

    /// Seconds between periodic runs
    pub periodic_interval_secs: u64,

    /// Heights of messages to keep; pruning is disabled when unset
    pub pruning_keep_recent: Option<i64>,

    /// Genesis document imported at startup
    pub genesis_file_path: Option<String>,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the raw value of a
    /// variable if it is set
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").ok_or(ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?;

        let bech32_prefix = lookup("BECH32_PREFIX").unwrap_or_else(|| "ovg".to_string());

        let parser_workers: usize = parse_or(&lookup, "PARSER_WORKERS", 5)?;
        if parser_workers == 0 {
            return Err(ConfigError::InvalidValue("PARSER_WORKERS"));
        }

        let periodic_interval_secs: u64 = parse_or(&lookup, "PERIODIC_INTERVAL_SECS", 60)?;
        if periodic_interval_secs == 0 {
            return Err(ConfigError::InvalidValue("PERIODIC_INTERVAL_SECS"));
        }

        let pruning_keep_recent: Option<i64> = parse_opt(&lookup, "PRUNING_KEEP_RECENT")?;
        if matches!(pruning_keep_recent, Some(keep) if keep <= 0) {
            return Err(ConfigError::InvalidValue("PRUNING_KEEP_RECENT"));
        }

        let genesis_file_path = lookup("GENESIS_FILE_PATH").filter(|path| !path.is_empty());

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        Ok(Self {
            database_url,
            database_max_connections,
            bech32_prefix,
            parser_workers,
            periodic_interval_secs,
            pruning_keep_recent,
            genesis_file_path,
            environment,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn periodic_interval(&self) -> Duration {
        Duration::from_secs(self.periodic_interval_secs)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}

fn parse_opt<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .map(|raw| raw.trim().parse().map_err(|_| ConfigError::InvalidValue(key)))
        .transpose()
}

/// Configuration error types
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/indexer")]).unwrap();

        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.bech32_prefix, "ovg");
        assert_eq!(config.parser_workers, 5);
        assert_eq!(config.periodic_interval(), Duration::from_secs(60));
        assert_eq!(config.pruning_keep_recent, None);
        assert_eq!(config.genesis_file_path, None);
        assert!(!config.is_production());
    }

    #[test]
    fn test_missing_database_url() {
        assert_eq!(load(&[]), Err(ConfigError::MissingEnv("DATABASE_URL")));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/indexer"),
            ("PARSER_WORKERS", "8"),
            ("PRUNING_KEEP_RECENT", "100"),
            ("GENESIS_FILE_PATH", "/data/genesis.json"),
            ("ENVIRONMENT", "production"),
        ])
        .unwrap();

        assert_eq!(config.parser_workers, 8);
        assert_eq!(config.pruning_keep_recent, Some(100));
        assert_eq!(config.genesis_file_path.as_deref(), Some("/data/genesis.json"));
        assert!(config.is_production());
    }

    #[test]
    fn test_invalid_values() {
        let url = ("DATABASE_URL", "postgres://db/indexer");

        assert_eq!(
            load(&[url, ("PARSER_WORKERS", "many")]),
            Err(ConfigError::InvalidValue("PARSER_WORKERS"))
        );
        assert_eq!(
            load(&[url, ("PARSER_WORKERS", "0")]),
            Err(ConfigError::InvalidValue("PARSER_WORKERS"))
        );
        assert_eq!(
            load(&[url, ("PRUNING_KEEP_RECENT", "-5")]),
            Err(ConfigError::InvalidValue("PRUNING_KEEP_RECENT"))
        );
    }
}
