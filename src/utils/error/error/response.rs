//! HTTP response handling for errors

use super::types::GatewayError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

/// Suggested client backoff when the queue is full
const OVERLOADED_RETRY_AFTER_SECS: u64 = 120;

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::DailyLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::Overloaded { .. } | GatewayError::Shutdown(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            GatewayError::RequestTimeout { .. } => StatusCode::REQUEST_TIMEOUT,
            GatewayError::UnitOfWork(_)
            | GatewayError::Provider { .. }
            | GatewayError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Validation(_)
            | GatewayError::Parsing(_)
            | GatewayError::Serialization(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_response = ErrorResponse {
            error: self.to_error_detail(),
        };

        let mut builder = HttpResponse::build(self.status_code());
        if matches!(self, GatewayError::Overloaded { .. }) {
            builder.insert_header(("Retry-After", OVERLOADED_RETRY_AFTER_SECS.to_string()));
        }
        builder.json(error_response)
    }
}

impl GatewayError {
    /// Client-facing description; internal failures are not detailed
    pub fn to_error_detail(&self) -> ErrorDetail {
        let (message, detail) = match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => (
                "An internal error occurred".to_string(),
                "An internal error occurred".to_string(),
            ),
            _ => (self.user_message(), self.to_string()),
        };

        ErrorDetail {
            code: self.code().to_string(),
            message,
            detail,
            retryable: self.is_retryable(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub detail: String,
    pub retryable: bool,
    pub timestamp: i64,
}
