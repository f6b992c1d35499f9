//! Catalog services: the only path from callers to the repositories.

use thiserror::Error;
use tracing::{debug, warn};

use dscommerce_core::{Page, PageRequest, ProductId};

use crate::dto::{CategoryDto, ProductDto, ProductMinDto};
use crate::product::Product;
use crate::repository::{CategoryRepository, ProductRepository, RepositoryError};

pub const RESOURCE_NOT_FOUND: &str = "Resource not found";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The requested product does not exist.
    #[error("{0}")]
    ResourceNotFound(String),

    /// Any other store failure, passed through untouched.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn resource_not_found() -> Self {
        Self::ResourceNotFound(RESOURCE_NOT_FOUND.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::ResourceNotFound(_))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone)]
pub struct ProductService<R> {
    repository: R,
}

impl<R> ProductService<R>
where
    R: ProductRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn find_by_id(&self, id: ProductId) -> ServiceResult<ProductDto> {
        debug!(product_id = %id, "find product by id");

        match self.repository.find_by_id(id).await? {
            Some(product) => Ok(ProductDto::from(&product)),
            None => {
                warn!(product_id = %id, "product not found");
                Err(ServiceError::resource_not_found())
            }
        }
    }

    pub async fn find_all(
        &self,
        name: &str,
        page: &PageRequest,
    ) -> ServiceResult<Page<ProductMinDto>> {
        debug!(filter = name, page = page.page, size = page.size, "search products by name");

        let products = self.repository.search_by_name(name, page).await?;
        Ok(products.map(ProductMinDto::from))
    }

    /// Persist a new product. Any id carried by `dto` is discarded.
    pub async fn insert(&self, dto: &ProductDto) -> ServiceResult<ProductDto> {
        if let Some(id) = dto.id {
            debug!(product_id = %id, "ignoring caller-supplied id on insert");
        }

        let product = Product::from(dto).without_id();
        let saved = self.repository.save(product).await?;

        debug!(product_id = ?saved.id(), "product inserted");
        Ok(ProductDto::from(&saved))
    }

    pub async fn update(&self, id: ProductId, dto: &ProductDto) -> ServiceResult<ProductDto> {
        debug!(product_id = %id, "update product");

        let mut reference = self
            .repository
            .try_get_reference(id)
            .await
            .map_err(|e| not_found_or_propagate(id, e))?;

        dto.copy_editable_fields(reference.entity_mut());

        let saved = self
            .repository
            .save(reference.into_entity())
            .await
            .map_err(|e| not_found_or_propagate(id, e))?;

        Ok(ProductDto::from(&saved))
    }

    pub async fn delete(&self, id: ProductId) -> ServiceResult<()> {
        debug!(product_id = %id, "delete product");

        if !self.repository.exists_by_id(id).await? {
            warn!(product_id = %id, "product not found");
            return Err(ServiceError::resource_not_found());
        }

        self.repository
            .delete_by_id(id)
            .await
            .map_err(|e| not_found_or_propagate(id, e))
    }
}

fn not_found_or_propagate(id: ProductId, err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::EntityNotFound(msg) => {
            warn!(product_id = %id, reason = %msg, "product not found");
            ServiceError::resource_not_found()
        }
        other => ServiceError::Repository(other),
    }
}

#[derive(Debug, Clone)]
pub struct CategoryService<R> {
    repository: R,
}

impl<R> CategoryService<R>
where
    R: CategoryRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<CategoryDto>> {
        let categories = self.repository.find_all().await?;
        Ok(categories.iter().map(CategoryDto::from).collect())
    }
}
