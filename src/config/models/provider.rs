//! Analysis provider configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI-compatible endpoint used for document analysis
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// Provider name used in logs and result metadata
    #[serde(default = "default_provider_name")]
    pub name: String,
    /// Base URL, e.g. `https://api.openai.com/v1`
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
    /// API key (bearer token)
    #[serde(default)]
    pub api_key: String,
    /// Model identifier
    #[serde(default = "default_provider_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,
    /// Completion budget for the quick scan
    #[serde(default = "default_quick_max_tokens")]
    pub quick_max_tokens: u32,
    /// Completion budget for the comprehensive pass
    #[serde(default = "default_comprehensive_max_tokens")]
    pub comprehensive_max_tokens: u32,
}

fn default_provider_name() -> String {
    "openai".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: default_provider_base_url(),
            api_key: String::new(),
            model: default_provider_model(),
            timeout_secs: default_provider_timeout_secs(),
            quick_max_tokens: default_quick_max_tokens(),
            comprehensive_max_tokens: default_comprehensive_max_tokens(),
        }
    }
}

// Keep the key out of `{:?}` output
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "[REDACTED]" })
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("quick_max_tokens", &self.quick_max_tokens)
            .field("comprehensive_max_tokens", &self.comprehensive_max_tokens)
            .finish()
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full chat completions URL
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
