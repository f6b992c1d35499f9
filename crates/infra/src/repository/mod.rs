//! Catalog repository adapters.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;
