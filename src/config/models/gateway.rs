//! Main gateway configuration

#![allow(missing_docs)]

use super::*;
use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Request scheduler ceilings
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Progressive analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Analysis provider endpoint
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Defaults overlaid with recognised environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = env_string("GATEWAY_HOST") {
            config.server.host = host;
        }
        if let Some(port) = env_parse("GATEWAY_PORT")? {
            config.server.port = port;
        }
        if let Some(v) = env_parse("RATE_LIMIT_RPM")? {
            config.rate_limit.requests_per_minute = v;
        }
        if let Some(v) = env_parse("RATE_LIMIT_TPM")? {
            config.rate_limit.tokens_per_minute = v;
        }
        if let Some(v) = env_parse("RATE_LIMIT_RPD")? {
            config.rate_limit.requests_per_day = v;
        }
        if let Some(v) = env_parse("RATE_LIMIT_MAX_CONCURRENT")? {
            config.rate_limit.max_concurrent_requests = v;
        }
        if let Some(v) = env_parse("RATE_LIMIT_MAX_QUEUE")? {
            config.rate_limit.max_queue_size = v;
        }
        if let Some(url) = env_string("LLM_BASE_URL") {
            config.provider.base_url = url;
        }
        if let Some(key) = env_string("LLM_API_KEY") {
            config.provider.api_key = key;
        }
        if let Some(model) = env_string("LLM_MODEL") {
            config.provider.model = model;
        }
        if let Some(level) = env_string("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(json) = env_parse("LOG_JSON")? {
            config.logging.json = json;
        }

        Ok(config)
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_string(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| GatewayError::Config(format!("Invalid value for {}: {}", key, e))),
        None => Ok(None),
    }
}
