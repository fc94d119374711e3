//! Utility modules for the gateway
//!
//! - **ai**: token estimation for analysis payloads
//! - **error**: the gateway error taxonomy and its HTTP mapping
//! - **logging**: tracing subscriber setup

pub mod ai;
pub mod error;
pub mod logging;

pub use ai::TokenUtils;
pub use error::{GatewayError, Result};
