use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use dscommerce_core::ProductId;
use dscommerce_products::ProductDto;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

fn parse_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    raw.parse::<ProductId>()
        .map_err(errors::domain_error_to_response)
}

/// Unwrap the JSON body and run field validation on it.
fn validated_body(
    body: Result<Json<ProductDto>, JsonRejection>,
) -> Result<ProductDto, axum::response::Response> {
    let Json(dto) = body.map_err(errors::json_rejection_to_response)?;
    dto.validate().map_err(errors::domain_error_to_response)?;
    Ok(dto)
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::ListProductsQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return errors::query_rejection_to_response(e),
    };
    let page = match query.page_request(services.default_page_size) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.products.find_all(query.name_filter(), &page).await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.products.find_by_id(id).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ProductDto>, JsonRejection>,
) -> axum::response::Response {
    let dto = match validated_body(body) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let created = match services.products.insert(&dto).await {
        Ok(p) => p,
        Err(e) => return errors::service_error_to_response(e),
    };

    let location = created
        .id
        .map(|id| format!("/products/{id}"))
        .unwrap_or_else(|| "/products".to_string());

    (StatusCode::CREATED, [(header::LOCATION, location)], Json(created)).into_response()
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ProductDto>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let dto = match validated_body(body) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    match services.products.update(id, &dto).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.products.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
