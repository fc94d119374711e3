//! Configuration validation
//!
//! This module provides validation logic for all configuration structures.
//!
//! - `trait_def`: Core Validate trait definition
//! - `config_validators`: Gateway, server and logging validators
//! - `rate_limit_validators`: Scheduler ceilings and analysis settings
//! - `provider_validators`: Analysis provider endpoint
//! - `tests`: Test suite for all validators

mod config_validators;
mod provider_validators;
mod rate_limit_validators;
mod trait_def;

pub use trait_def::Validate;
