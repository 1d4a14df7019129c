//! Gateway error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the gateway. Each variant
//! maps to an HTTP status code; the response body is always
//! `{"error": "<message>"}` so validation failures surface verbatim to
//! the client while upstream failures stay generic.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// JSON error response body: `{"error": "Invalid region"}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// Validation errors carry the exact message the client sees. Upstream
/// and persistence errors keep their detail for the logs and map to a
/// generic 500 message on the wire.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Region path parameter is not a supported AWS region.
    #[error("Invalid region")]
    InvalidRegion,

    /// Request body failed validation.
    #[error("{0}")]
    Validation(String),

    /// Price alert with the given ID was not found.
    #[error("alert {0} not found")]
    AlertNotFound(uuid::Uuid),

    /// The AWS Pricing or EC2 API call failed.
    #[error("upstream pricing request failed: {0}")]
    Upstream(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Alert delivery failure.
    #[error("notification error: {0}")]
    Notification(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRegion | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::AlertNotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_)
            | Self::Persistence(_)
            | Self::Notification(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message sent to the client.
    ///
    /// Validation messages pass through unchanged; server-side failures
    /// are replaced with a generic message and logged by the caller.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::InvalidRegion | Self::Validation(_) => self.to_string(),
            Self::AlertNotFound(_) => "Alert not found".to_string(),
            Self::Upstream(_) => "Failed to fetch pricing data".to_string(),
            Self::Persistence(_) | Self::Notification(_) | Self::Internal(_) => {
                "Something went wrong!".to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.client_message(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}
