//! Database configuration loading.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("failed to connect to database: {0}")]
    Connect(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Read `DATABASE_URL` and `DATABASE_MAX_CONNECTIONS` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DatabaseConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid {
                    key: "DATABASE_MAX_CONNECTIONS",
                    value: raw,
                })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            url,
            max_connections,
            acquire_timeout: Duration::from_secs(5),
        })
    }

    pub async fn connect(&self) -> Result<PgPool, ConfigError> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect(&self.url)
            .await?;
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn url_is_required() {
        let err = DatabaseConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn max_connections_defaults() {
        let cfg = DatabaseConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/dscommerce")])).unwrap();
        assert_eq!(cfg.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(cfg.url, "postgres://localhost/dscommerce");
    }

    #[test]
    fn max_connections_must_be_positive_number() {
        for bad in ["0", "many"] {
            let err = DatabaseConfig::from_lookup(lookup(&[
                ("DATABASE_URL", "postgres://localhost/dscommerce"),
                ("DATABASE_MAX_CONNECTIONS", bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { key: "DATABASE_MAX_CONNECTIONS", .. }));
        }
    }
}
