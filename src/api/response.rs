//! Error responses for the HR workflow API.
//!
//! Every failure is reported as an [`ApiError`] body with a stable `code`
//! and a status derived from the [`WorkflowError`] kind.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// The request carried no usable `X-User-Id` header.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: ApiError::new("UNAUTHENTICATED", message),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<WorkflowError> for ApiErrorResponse {
    fn from(error: WorkflowError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            WorkflowError::Validation { field, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details("VALIDATION_ERROR", message, field),
            ),
            WorkflowError::Duplicate { field, .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details("DUPLICATE", message, field),
            ),
            WorkflowError::NotFound { entity, .. } => (
                StatusCode::NOT_FOUND,
                ApiError::with_details("NOT_FOUND", message, entity),
            ),
            WorkflowError::InvalidState { status, .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details("INVALID_STATE", message, status),
            ),
            WorkflowError::HasDependents { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("HAS_DEPENDENTS", message),
            ),
            WorkflowError::Denied { .. } => {
                (StatusCode::FORBIDDEN, ApiError::new("PERMISSION_DENIED", message))
            }
            WorkflowError::Store { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("STORE_ERROR", "The record store failed"),
            ),
            WorkflowError::Credential { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("CREDENTIAL_ERROR", "Password hashing failed"),
            ),
            WorkflowError::ConfigNotFound { .. } | WorkflowError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let error = match rejection {
            JsonRejection::JsonDataError(err) => {
                let body_text = err.body_text();
                if body_text.contains("missing field") {
                    ApiError::new("VALIDATION_ERROR", body_text)
                } else {
                    ApiError::new("MALFORMED_JSON", body_text)
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                ApiError::new("MALFORMED_JSON", format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
            }
            _ => ApiError::new("MALFORMED_JSON", "Failed to parse request body"),
        };
        ApiErrorResponse {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}
