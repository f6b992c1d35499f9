//! Persistence ports consumed by the catalog services.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use dscommerce_core::{Page, PageRequest, ProductId};

use crate::product::{Category, Product};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// A referenced entity does not exist in the store.
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// The write would break referential or uniqueness constraints.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// The store could not be reached or failed unexpectedly.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn entity_not_found(msg: impl Into<String>) -> Self {
        Self::EntityNotFound(msg.into())
    }

    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::Integrity(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Handle to a product that existed in the store when it was resolved.
///
/// Mutate the entity through `entity_mut` and hand it back with `into_entity`;
/// the identifier it was resolved with is always restored.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRef {
    id: ProductId,
    entity: Product,
}

impl ProductRef {
    /// Wrap a persisted product. Returns `None` for a product without an id.
    pub fn new(entity: Product) -> Option<Self> {
        let id = entity.id()?;
        Some(Self { id, entity })
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn entity(&self) -> &Product {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Product {
        &mut self.entity
    }

    pub fn into_entity(self) -> Product {
        self.entity.with_id(self.id)
    }
}

/// Product persistence port.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Products whose name contains `name` literally (case-insensitive); empty matches all.
    async fn search_by_name(
        &self,
        name: &str,
        page: &PageRequest,
    ) -> Result<Page<Product>, RepositoryError>;

    /// Insert (no id) or overwrite (with id); returns the stored product.
    async fn save(&self, product: Product) -> Result<Product, RepositoryError>;

    /// Resolve a handle for an existing product or fail with `EntityNotFound`.
    async fn try_get_reference(&self, id: ProductId) -> Result<ProductRef, RepositoryError>;

    async fn exists_by_id(&self, id: ProductId) -> Result<bool, RepositoryError>;

    async fn delete_by_id(&self, id: ProductId) -> Result<(), RepositoryError>;
}

#[async_trait]
impl<R> ProductRepository for Arc<R>
where
    R: ProductRepository + ?Sized,
{
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        (**self).find_by_id(id).await
    }

    async fn search_by_name(
        &self,
        name: &str,
        page: &PageRequest,
    ) -> Result<Page<Product>, RepositoryError> {
        (**self).search_by_name(name, page).await
    }

    async fn save(&self, product: Product) -> Result<Product, RepositoryError> {
        (**self).save(product).await
    }

    async fn try_get_reference(&self, id: ProductId) -> Result<ProductRef, RepositoryError> {
        (**self).try_get_reference(id).await
    }

    async fn exists_by_id(&self, id: ProductId) -> Result<bool, RepositoryError> {
        (**self).exists_by_id(id).await
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<(), RepositoryError> {
        (**self).delete_by_id(id).await
    }
}

/// Category persistence port (read-only).
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by id.
    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError>;
}

#[async_trait]
impl<R> CategoryRepository for Arc<R>
where
    R: CategoryRepository + ?Sized,
{
    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        (**self).find_all().await
    }
}
