//! Service wiring: picks the repository adapter and builds the services on it.

use std::sync::Arc;

use anyhow::Context;

use dscommerce_infra::{DatabaseConfig, InMemoryCatalogStore, PostgresCatalogStore};
use dscommerce_products::{CategoryRepository, CategoryService, ProductRepository, ProductService};

use crate::config::ApiConfig;

pub type DynProductRepository = Arc<dyn ProductRepository>;
pub type DynCategoryRepository = Arc<dyn CategoryRepository>;

/// Everything the handlers need, shared behind an `Arc`.
pub struct AppServices {
    pub products: ProductService<DynProductRepository>,
    pub categories: CategoryService<DynCategoryRepository>,
    pub default_page_size: u32,
}

impl AppServices {
    /// Services over a single store implementing both repository ports.
    pub fn new<S>(store: Arc<S>, default_page_size: u32) -> Self
    where
        S: ProductRepository + CategoryRepository + 'static,
    {
        let products: DynProductRepository = store.clone();
        let categories: DynCategoryRepository = store;
        Self {
            products: ProductService::new(products),
            categories: CategoryService::new(categories),
            default_page_size,
        }
    }

    /// Services over the seeded in-memory catalog.
    pub fn in_memory(default_page_size: u32) -> Self {
        Self::new(Arc::new(InMemoryCatalogStore::seeded()), default_page_size)
    }
}

pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    if !config.use_persistent_stores {
        tracing::info!("using seeded in-memory catalog");
        return Ok(AppServices::in_memory(config.default_page_size));
    }

    build_persistent_services(config).await
}

async fn build_persistent_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    let db = DatabaseConfig::from_env().context("USE_PERSISTENT_STORES=true requires database settings")?;
    let pool = db.connect().await.context("failed to connect to Postgres")?;

    let store = Arc::new(PostgresCatalogStore::new(pool));
    store
        .apply_schema()
        .await
        .context("failed to apply catalog schema")?;

    tracing::info!(max_connections = db.max_connections, "using Postgres catalog");
    Ok(AppServices::new(store, config.default_page_size))
}
