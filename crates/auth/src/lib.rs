//! `dscommerce-auth`: user accounts and granted roles.
//!
//! Data model only: authentication and access checks are not handled here.

pub mod roles;
pub mod user;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use roles::{Role, ROLE_ADMIN, ROLE_CLIENT};
pub use user::User;
