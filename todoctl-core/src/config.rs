//! Database configuration resolved from the environment.
//!
//! `DATABASE_URL` is required. There is no built-in fallback: when it is
//! missing, resolution fails before any engine is created.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::dsn::DatabaseUrl;
use crate::error::ConfigError;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
pub const DATABASE_MIN_CONNECTIONS: &str = "DATABASE_MIN_CONNECTIONS";
pub const DATABASE_ACQUIRE_TIMEOUT_SECS: &str = "DATABASE_ACQUIRE_TIMEOUT_SECS";

/// Default maximum connections for the pool.
/// Kept low for a single small web app.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

pub const DEFAULT_MIN_CONNECTIONS: u32 = 0;

pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Everything needed to build an [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: DatabaseUrl,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Config with default pool settings for an already-validated URL.
    pub fn new(url: DatabaseUrl) -> Self {
        Self {
            url,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        }
    }

    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through `lookup`.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = get(DATABASE_URL).ok_or(ConfigError::Missing { var: DATABASE_URL })?;
        let url = DatabaseUrl::parse(&raw_url)?;

        let max_connections = match get(DATABASE_MAX_CONNECTIONS) {
            Some(v) => parse_number::<u32>(DATABASE_MAX_CONNECTIONS, &v)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: DATABASE_MAX_CONNECTIONS,
                reason: "must be at least 1".into(),
            });
        }

        let min_connections = match get(DATABASE_MIN_CONNECTIONS) {
            Some(v) => parse_number::<u32>(DATABASE_MIN_CONNECTIONS, &v)?,
            None => DEFAULT_MIN_CONNECTIONS,
        };
        if min_connections > max_connections {
            return Err(ConfigError::Invalid {
                var: DATABASE_MIN_CONNECTIONS,
                reason: format!(
                    "{} exceeds {} ({})",
                    min_connections, DATABASE_MAX_CONNECTIONS, max_connections
                ),
            });
        }

        let acquire_timeout = match get(DATABASE_ACQUIRE_TIMEOUT_SECS) {
            Some(v) => Duration::from_secs(parse_number::<u64>(DATABASE_ACQUIRE_TIMEOUT_SECS, &v)?),
            None => Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        };

        debug!(
            url = %url,
            max_connections,
            min_connections,
            acquire_timeout_secs = acquire_timeout.as_secs(),
            "database config resolved"
        );

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout,
        })
    }

    /// Replace the URL, keeping pool settings.
    pub fn with_url(mut self, url: DatabaseUrl) -> Self {
        self.url = url;
        self
    }
}

fn parse_number<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        var,
        reason: format!("'{}': {}", value, e),
    })
}

/// Get the todoctl config directory path (~/.todoctl)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".todoctl"))
}

/// Load environment variables from .env files.
///
/// Priority order (highest to lowest):
/// 1. Environment variables already set
/// 2. Current directory .env
/// 3. ~/.todoctl/.env
///
/// dotenvy never overwrites variables that are already set, so loading the
/// more specific file first gives it precedence.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => {
                    debug!("Loaded .env from ~/.todoctl: {}", env_file.display());
                    loaded_from.push(env_file);
                }
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found (current dir or ~/.todoctl)");
    } else {
        info!(files = loaded_from.len(), "Loaded .env configuration");
    }

    loaded_from
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::UrlError;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn connection_target_is_the_env_value() {
        let value = "postgresql://app:pw@db.internal/tasks";
        let config = DatabaseConfig::from_lookup(lookup(&[(DATABASE_URL, value)])).unwrap();
        assert_eq!(config.url.as_str(), value);
    }

    #[test]
    fn surrounding_whitespace_is_kept_verbatim() {
        let value = " postgres://h/d\n";
        let config = DatabaseConfig::from_lookup(lookup(&[(DATABASE_URL, value)])).unwrap();
        assert_eq!(config.url.as_str(), value);
        assert_eq!(config.url.database(), "d");
    }

    #[test]
    fn missing_url_fails_fast() {
        let err = DatabaseConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing { var: DATABASE_URL });
    }

    #[test]
    fn blank_url_counts_as_missing() {
        let err = DatabaseConfig::from_lookup(lookup(&[(DATABASE_URL, "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing { var: DATABASE_URL });
    }

    #[test]
    fn malformed_url_is_rejected() {
        let err =
            DatabaseConfig::from_lookup(lookup(&[(DATABASE_URL, "sqlite://tasks.db")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Url(UrlError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn defaults_apply() {
        let config =
            DatabaseConfig::from_lookup(lookup(&[(DATABASE_URL, "postgres://localhost/todo")]))
                .unwrap();
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.min_connections, DEFAULT_MIN_CONNECTIONS);
        assert_eq!(
            config.acquire_timeout,
            Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS)
        );
    }

    #[test]
    fn pool_settings_are_read() {
        let config = DatabaseConfig::from_lookup(lookup(&[
            (DATABASE_URL, "postgres://localhost/todo"),
            (DATABASE_MAX_CONNECTIONS, "12"),
            (DATABASE_MIN_CONNECTIONS, "2"),
            (DATABASE_ACQUIRE_TIMEOUT_SECS, "3"),
        ]))
        .unwrap();
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.acquire_timeout, Duration::from_secs(3));
    }

    #[test]
    fn non_numeric_pool_size_is_invalid() {
        let err = DatabaseConfig::from_lookup(lookup(&[
            (DATABASE_URL, "postgres://localhost/todo"),
            (DATABASE_MAX_CONNECTIONS, "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: DATABASE_MAX_CONNECTIONS,
                ..
            }
        ));
    }

    #[test]
    fn zero_max_connections_is_invalid() {
        let err = DatabaseConfig::from_lookup(lookup(&[
            (DATABASE_URL, "postgres://localhost/todo"),
            (DATABASE_MAX_CONNECTIONS, "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn min_above_max_is_invalid() {
        let err = DatabaseConfig::from_lookup(lookup(&[
            (DATABASE_URL, "postgres://localhost/todo"),
            (DATABASE_MAX_CONNECTIONS, "2"),
            (DATABASE_MIN_CONNECTIONS, "3"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: DATABASE_MIN_CONNECTIONS,
                ..
            }
        ));
    }

    #[test]
    fn with_url_keeps_pool_settings() {
        let config = DatabaseConfig::from_lookup(lookup(&[
            (DATABASE_URL, "postgres://localhost/todo"),
            (DATABASE_MAX_CONNECTIONS, "9"),
        ]))
        .unwrap();
        let other = DatabaseUrl::parse("postgres://otherhost/todo").unwrap();
        let config = config.with_url(other);
        assert_eq!(config.url.host(), "otherhost");
        assert_eq!(config.max_connections, 9);
    }
}
