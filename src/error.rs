//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "Email already subscribed"
///   },
///   "detail": "Email already subscribed"
/// }
/// ```
///
/// `detail` repeats the message for the landing page script, which reads
/// it to show subscription errors.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
    /// Same text as `error.message`.
    pub detail: String,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Request         | 400 Bad Request / 401        |
/// | 2000–2999 | State           | 400 Bad Request              |
/// | 3000–3999 | Server/Upstream | 500 / 502                    |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A required field is missing or empty.
    #[error("{0}")]
    Validation(String),

    /// The email is already present in the subscriber table.
    #[error("Email already subscribed")]
    DuplicateEmail,

    /// Admin credential absent or incorrect.
    #[error("Invalid admin credential")]
    Unauthorized,

    /// Persistence engine failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// External market-data source failed after retries.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::Unauthorized => 1002,
            Self::DuplicateEmail => 2001,
            Self::Internal(_) => 3000,
            Self::Storage(_) => 3001,
            Self::UpstreamUnavailable(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::DuplicateEmail => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let message = self.to_string();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: message.clone(),
                details: None,
            },
            detail: message,
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(
            GatewayError::Validation("Email is required".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::DuplicateEmail.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn storage_maps_to_500() {
        let err = GatewayError::Storage("disk unavailable".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), 3001);
    }

    #[test]
    fn validation_message_is_passed_through() {
        let err = GatewayError::Validation("Email is required".to_string());
        assert_eq!(err.to_string(), "Email is required");
    }

    #[test]
    fn into_response_sets_status() {
        let response = GatewayError::DuplicateEmail.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn body_carries_message_as_detail() {
        let response = GatewayError::DuplicateEmail.into_response();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body");
        };
        let Ok(body) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            panic!("json");
        };
        assert_eq!(
            body.pointer("/detail").and_then(|v| v.as_str()),
            Some("Email already subscribed")
        );
        assert_eq!(
            body.pointer("/error/message").and_then(|v| v.as_str()),
            Some("Email already subscribed")
        );
        assert_eq!(body.pointer("/error/code").and_then(|v| v.as_u64()), Some(2001));
    }
}
