//! Infrastructure layer: repository adapters and database configuration.

pub mod config;
pub mod repository;

pub use config::{ConfigError, DatabaseConfig};
pub use repository::{InMemoryCatalogStore, PostgresCatalogStore};
