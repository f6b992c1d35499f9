//! Domain error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMessage {
    pub field_name: String,
    pub message: String,
}

impl FieldMessage {
    pub fn new(field_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            message: message.into(),
        }
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic input failures. Lookups that miss and
/// storage failures are reported by the service and repository layers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more fields failed validation.
    #[error("validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldMessage>),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A sort expression named an unknown field or direction.
    #[error("invalid sort: {0}")]
    InvalidSort(String),
}

impl DomainError {
    pub fn validation(errors: Vec<FieldMessage>) -> Self {
        Self::Validation(errors)
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_sort(msg: impl Into<String>) -> Self {
        Self::InvalidSort(msg.into())
    }

    /// Field errors carried by a validation failure (empty for other kinds).
    pub fn field_errors(&self) -> &[FieldMessage] {
        match self {
            DomainError::Validation(errors) => errors,
            _ => &[],
        }
    }
}
