use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, routing::get, Json, Router};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/", get(list_categories))
}

pub async fn list_categories(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.categories.find_all().await {
        Ok(categories) => Json(categories).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
