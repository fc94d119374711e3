//! Helper functions for creating specific error types

use super::types::GatewayError;

/// Helper functions for creating specific errors
impl GatewayError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn unit_of_work<S: Into<String>>(message: S) -> Self {
        Self::UnitOfWork(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn parsing<S: Into<String>>(message: S) -> Self {
        Self::Parsing(message.into())
    }

    pub fn shutdown<S: Into<String>>(message: S) -> Self {
        Self::Shutdown(message.into())
    }

    pub fn provider<P: Into<String>, S: Into<String>>(
        provider: P,
        status: Option<u16>,
        message: S,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Whether the caller may reasonably retry the same request later
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Overloaded { .. } | Self::RequestTimeout { .. } => true,
            Self::HttpClient(e) => e.is_timeout() || e.is_connect(),
            Self::Provider { status, .. } => {
                matches!(status, None | Some(429) | Some(500..=599))
            }
            _ => false,
        }
    }

    /// Short, user-facing guidance for scheduler rejections
    pub fn user_message(&self) -> String {
        match self {
            Self::DailyLimitExceeded { .. } => {
                "You have reached your daily analysis limit. Please try again tomorrow or upgrade your plan."
                    .to_string()
            }
            Self::Overloaded { .. } => {
                "The service is busy right now. Please retry in a few minutes.".to_string()
            }
            Self::RequestTimeout { .. } => {
                "Your request waited too long in the queue. Please try again.".to_string()
            }
            Self::UnitOfWork(_) | Self::Provider { .. } | Self::HttpClient(_) => {
                "The analysis service failed to respond. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::DailyLimitExceeded { .. } => "DAILY_LIMIT_EXCEEDED",
            Self::Overloaded { .. } => "OVERLOADED",
            Self::RequestTimeout { .. } => "REQUEST_TIMEOUT",
            Self::UnitOfWork(_) => "UNIT_OF_WORK_FAILED",
            Self::Shutdown(_) => "SHUTDOWN",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Provider { .. } => "PROVIDER_ERROR",
            Self::HttpClient(_) => "NETWORK_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Yaml(_) => "YAML_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Parsing(_) => "PARSING_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
