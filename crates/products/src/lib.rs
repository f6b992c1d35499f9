//! Products domain module.
//!
//! Catalog entities, their transfer objects, the persistence ports and the
//! services built on top of them. Storage adapters live in `dscommerce-infra`.

pub mod dto;
pub mod product;
pub mod repository;
pub mod service;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use dto::{CategoryDto, ProductDto, ProductMinDto};
pub use product::{Category, Product};
pub use repository::{CategoryRepository, ProductRef, ProductRepository, RepositoryError};
pub use service::{CategoryService, ProductService, ServiceError, ServiceResult};
