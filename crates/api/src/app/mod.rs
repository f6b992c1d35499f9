//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: repository adapter selection and service construction
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: query-string DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router around already-constructed services.
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_id))
                .layer(Extension(services)),
        )
}
