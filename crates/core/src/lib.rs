//! `dscommerce-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod page;

pub use error::{DomainError, DomainResult, FieldMessage};
pub use id::{CategoryId, ProductId, RoleId, UserId};
pub use page::{Page, PageRequest, Sort, SortDirection, SortField};
