//! Integration tests for review-gateway
//!
//! These tests verify the interaction between multiple components
//! and test real system behavior through the public API.

pub mod analysis_tests;
pub mod config_tests;
pub mod provider_tests;
pub mod scheduler_tests;
