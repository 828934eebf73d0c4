//! API error handling
//!
//! Domain errors map onto HTTP statuses: missing entities (including
//! unknown related ids) are 404, business rule violations are 422,
//! malformed input is 400, store conflicts are 409 and everything else
//! is 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_kernel::StoreError;
use domain_registry::RegistryError;
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "business_rule", msg)
            }
            ApiError::Internal(msg) => {
                // Internals are logged, not leaked.
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::NotFound { .. } | RegistryError::RelatedNotFound { .. } => {
                ApiError::NotFound(error.to_string())
            }
            RegistryError::BusinessRule(msg) => ApiError::BusinessRule(msg),
            RegistryError::Store(store) => store.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { .. } => ApiError::NotFound(error.to_string()),
            StoreError::Conflict { .. } => ApiError::Conflict(error.to_string()),
            StoreError::Connection { .. } | StoreError::Internal { .. } => {
                ApiError::Internal(error.to_string())
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_related_not_found_maps_to_not_found() {
        let error = RegistryError::related_not_found("Supplier", vec![Uuid::new_v4()]);
        let api: ApiError = error.into();
        assert!(matches!(api, ApiError::NotFound(_)));
    }

    #[test]
    fn test_business_rule_maps_to_unprocessable() {
        let api: ApiError = RegistryError::business_rule("under-age supplier").into();
        assert!(matches!(api, ApiError::BusinessRule(_)));
    }

    #[test]
    fn test_store_conflict_maps_to_conflict() {
        let api: ApiError = RegistryError::Store(StoreError::conflict("duplicate key")).into();
        assert!(matches!(api, ApiError::Conflict(_)));
    }
}
