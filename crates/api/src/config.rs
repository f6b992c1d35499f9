//! API settings read from the environment at startup.

use std::net::SocketAddr;

use dscommerce_core::page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use dscommerce_infra::ConfigError;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Use Postgres instead of the seeded in-memory catalog.
    pub use_persistent_stores: bool,
    pub default_page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            use_persistent_stores: false,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "BIND_ADDR",
                value: raw,
            })?,
            None => defaults.bind_addr,
        };

        let use_persistent_stores = match lookup("USE_PERSISTENT_STORES") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid {
                key: "USE_PERSISTENT_STORES",
                value: raw,
            })?,
            None => defaults.use_persistent_stores,
        };

        let default_page_size = match lookup("DEFAULT_PAGE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| (1..=MAX_PAGE_SIZE).contains(n))
                .ok_or(ConfigError::Invalid {
                    key: "DEFAULT_PAGE_SIZE",
                    value: raw,
                })?,
            None => defaults.default_page_size,
        };

        Ok(Self {
            bind_addr,
            use_persistent_stores,
            default_page_size,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}
