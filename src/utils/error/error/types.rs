//! Error type definitions

use thiserror::Error;

/// Result type alias for the Gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the Gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The caller has used up its share of the daily request budget
    #[error("Daily request limit of {limit} reached for caller {caller_id}")]
    DailyLimitExceeded { caller_id: String, limit: u32 },

    /// The admission queue is full (or the circuit breaker is engaged)
    #[error("Service overloaded: queue holds {queue_length} of {max_queue_size} requests")]
    Overloaded {
        queue_length: usize,
        max_queue_size: usize,
    },

    /// A queued request waited longer than its maximum wait time
    #[error("Request timed out after waiting {waited_ms}ms in queue")]
    RequestTimeout { waited_ms: u64 },

    /// The wrapped unit of work failed
    #[error("Unit of work failed: {0}")]
    UnitOfWork(String),

    /// The scheduler stopped while the request was pending
    #[error("Scheduler shut down: {0}")]
    Shutdown(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream analysis provider errors
    #[error("Provider error ({provider}): {message}")]
    Provider {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing errors
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
