use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the sparrow-notify service
#[derive(Debug, Error)]
pub enum SparrowError {
    // Caller errors
    #[error("Validation failed: {}", summarize(.0))]
    ValidationFailed(Vec<ValidationError>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    // Setup errors
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // Provider errors
    #[error("Provider responded with status {status}")]
    GatewayError { status: u16, body: serde_json::Value },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Internal server error: {0}")]
    InternalServer(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl SparrowError {
    /// HTTP status this error surfaces as.
    pub fn status_code(&self) -> StatusCode {
        match self {
            SparrowError::ValidationFailed(_) | SparrowError::BadRequest(_) => StatusCode::BAD_REQUEST,
            SparrowError::ConfigurationError(_) | SparrowError::InternalServer(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            // Mirror the provider when it gave us an error status we can pass on
            SparrowError::GatewayError { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            SparrowError::NetworkError(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SparrowError::ValidationFailed(_) => "validation_failed",
            SparrowError::BadRequest(_) => "bad_request",
            SparrowError::ConfigurationError(_) => "configuration_error",
            SparrowError::GatewayError { .. } => "gateway_error",
            SparrowError::NetworkError(_) => "network_error",
            SparrowError::InternalServer(_) => "internal_error",
        }
    }
}

impl IntoResponse for SparrowError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        tracing::error!(
            code = %code,
            status = %status.as_u16(),
            message = %message,
            "Request failed"
        );

        let details = match self {
            SparrowError::ValidationFailed(errors) => serde_json::to_value(&errors).ok(),
            SparrowError::GatewayError { body, .. } => Some(body),
            _ => None,
        };

        let error_response = ErrorResponse {
            success: false,
            error: message,
            code,
            details,
        };

        (status, axum::Json(error_response)).into_response()
    }
}

// Convenience type alias for Results
pub type SparrowResult<T> = Result<T, SparrowError>;

impl From<reqwest::Error> for SparrowError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SparrowError::NetworkError(format!("provider did not respond in time: {}", err))
        } else if err.is_connect() {
            SparrowError::NetworkError(format!("could not reach provider: {}", err))
        } else if err.is_request() {
            // Sent but dropped before any response came back
            SparrowError::NetworkError(format!("provider request failed: {}", err))
        } else {
            SparrowError::InternalServer(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SparrowError {
    fn from(err: serde_json::Error) -> Self {
        SparrowError::InternalServer(format!("JSON error: {}", err))
    }
}

impl From<::config::ConfigError> for SparrowError {
    fn from(err: ::config::ConfigError) -> Self {
        SparrowError::ConfigurationError(err.to_string())
    }
}

// Helper functions for creating common errors
impl SparrowError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        SparrowError::BadRequest(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        SparrowError::ConfigurationError(msg.into())
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        SparrowError::InternalServer(msg.into())
    }

    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        SparrowError::ValidationFailed(vec![ValidationError {
            field: field.into(),
            message: message.into(),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let error = SparrowError::validation_error("title", "title is required");
        assert_eq!(error.to_string(), "Validation failed: title is required");
    }

    #[test]
    fn test_validation_error() {
        let error = SparrowError::validation_error("recipient_ids", "no recipient ids provided");
        match error {
            SparrowError::ValidationFailed(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "recipient_ids");
                assert_eq!(errors[0].message, "no recipient ids provided");
            }
            _ => panic!("Expected ValidationFailed error"),
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(SparrowError::validation_error("a", "b").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(SparrowError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            SparrowError::configuration("missing").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            SparrowError::NetworkError("timeout".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_gateway_status_mirrors_provider() {
        let err = SparrowError::GatewayError { status: 400, body: json!({"errors": ["bad"]}) };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = SparrowError::GatewayError { status: 502, body: json!(null) };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);

        // Not an error status, so fall back to 500
        let err = SparrowError::GatewayError { status: 302, body: json!(null) };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_helper_functions() {
        assert!(matches!(SparrowError::bad_request("test"), SparrowError::BadRequest(_)));
        assert!(matches!(SparrowError::configuration("test"), SparrowError::ConfigurationError(_)));
        assert!(matches!(SparrowError::internal_error("test"), SparrowError::InternalServer(_)));
    }
}
