//! Core functionality for the Gateway
//!
//! The request scheduler and the progressive analysis workflow built on it.

pub mod analysis;
pub mod rate_limiter;

pub use analysis::{AnalysisProvider, LlmAnalysisProvider, ProgressiveAnalyzer};
pub use rate_limiter::{RateLimitManager, RequestPriority, SchedulerHandle, SubmitOptions};
