use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::json;

use dscommerce_core::DomainError;
use dscommerce_products::{RepositoryError, ServiceError};

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "timestamp": Utc::now(),
            "status": status.as_u16(),
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::Validation(errors) => {
            let status = StatusCode::UNPROCESSABLE_ENTITY;
            (
                status,
                axum::Json(json!({
                    "timestamp": Utc::now(),
                    "status": status.as_u16(),
                    "error": "validation_error",
                    "message": "Invalid data",
                    "errors": errors,
                })),
            )
                .into_response()
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvalidSort(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_sort", msg),
    }
}

pub fn service_error_to_response(err: ServiceError) -> Response {
    match err {
        ServiceError::ResourceNotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        // Reaches here from insert only, when the body references a missing category.
        ServiceError::Repository(RepositoryError::EntityNotFound(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "entity_not_found", msg)
        }
        ServiceError::Repository(RepositoryError::Integrity(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "integrity_violation", msg)
        }
        ServiceError::Repository(RepositoryError::Unavailable(msg)) => {
            tracing::error!(reason = %msg, "repository unavailable");
            json_error(StatusCode::SERVICE_UNAVAILABLE, "unavailable", "service temporarily unavailable")
        }
    }
}

pub fn json_rejection_to_response(rejection: JsonRejection) -> Response {
    json_error(rejection.status(), "invalid_body", rejection.body_text())
}

pub fn query_rejection_to_response(rejection: QueryRejection) -> Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_query", rejection.body_text())
}
