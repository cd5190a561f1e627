//! Unified API error handling with structured responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::chat::ChatError;
use crate::upstream::UpstreamError;

/// Generic message for operator faults; the cause is logged, never returned.
const GENERIC_SERVER_ERROR: &str = "Something went wrong. Please try again.";

/// Generic retry-suggesting message for upstream faults without a
/// caller-safe message.
const GENERIC_UPSTREAM_ERROR: &str =
    "The AI service did not respond as expected. Please try again.";

/// API error type with structured responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client fault; the message is returned verbatim.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Operator fault; the caller sees a generic message.
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Upstream fault with an upstream-supplied message to pass through.
    #[error("Gateway error: {0}")]
    BadGateway(String),

    /// Upstream fault with no caller-safe message (transport, parse,
    /// unexpected shape); the caller sees a generic retry message.
    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadGateway(_) | Self::UpstreamFailure(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// The message returned to the caller. Operator faults and opaque
    /// upstream failures get a generic message; the underlying cause only
    /// goes to the log.
    fn public_message(&self) -> String {
        match self {
            Self::BadRequest(msg) | Self::BadGateway(msg) => msg.clone(),
            Self::Internal(_) => GENERIC_SERVER_ERROR.to_string(),
            Self::UpstreamFailure(_) => GENERIC_UPSTREAM_ERROR.to_string(),
        }
    }
}

/// Structured error response envelope: `{success: false, error: {message, code}}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

/// The error object inside the envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log errors appropriately
        match &self {
            ApiError::Internal(msg) => {
                error!(message = %msg, "API error");
            }
            ApiError::BadGateway(msg) | ApiError::UpstreamFailure(msg) => {
                warn!(message = %msg, "Upstream error");
            }
            ApiError::BadRequest(msg) => {
                debug!(message = %msg, "Client error");
            }
        }

        let body = ErrorResponse {
            success: false,
            error: ErrorBody {
                message: self.public_message(),
                code: status.as_u16(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Map conversation errors onto HTTP status classes. This is the single
/// place the core taxonomy meets status codes and caller-facing phrasing.
impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Validation(msg) => ApiError::BadRequest(msg),
            ChatError::Configuration(msg) => ApiError::Internal(msg),
            ChatError::Upstream(UpstreamError::Api { message, .. }) => {
                ApiError::BadGateway(message)
            }
            ChatError::Upstream(other) => ApiError::UpstreamFailure(other.to_string()),
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request_with_literal_message() {
        let api_err = ApiError::from(ChatError::Validation("message is empty".to_string()));
        assert!(matches!(api_err, ApiError::BadRequest(_)));
        assert_eq!(api_err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(api_err.public_message(), "message is empty");
    }

    #[test]
    fn test_configuration_hides_cause_from_caller() {
        let api_err = ApiError::from(ChatError::Configuration(
            "upstream API credential is not configured".to_string(),
        ));
        assert_eq!(api_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_err.public_message(), GENERIC_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_api_message_passes_through() {
        let api_err = ApiError::from(ChatError::Upstream(UpstreamError::Api {
            status: Some(429),
            message: "rate limited".to_string(),
        }));
        assert_eq!(api_err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(api_err.public_message(), "rate limited");
    }

    #[test]
    fn test_unexpected_shape_gets_generic_retry_message() {
        let api_err = ApiError::from(ChatError::Upstream(UpstreamError::UnexpectedShape));
        assert_eq!(api_err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(api_err.public_message(), GENERIC_UPSTREAM_ERROR);
    }

    #[test]
    fn test_parse_error_gets_generic_retry_message() {
        let api_err = ApiError::from(ChatError::Upstream(UpstreamError::Parse(
            "eof while parsing".to_string(),
        )));
        assert_eq!(api_err.public_message(), GENERIC_UPSTREAM_ERROR);
    }
}
