//! Analysis provider validators

use super::trait_def::Validate;
use crate::config::models::*;
use url::Url;

impl Validate for ProviderConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Provider name cannot be empty".to_string());
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| format!("Provider base URL is invalid: {}", e))?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(format!(
                    "Provider base URL must use http:// or https:// scheme, got: {}",
                    scheme
                ));
            }
        }

        if self.model.trim().is_empty() {
            return Err("Provider model cannot be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Provider timeout must be greater than 0".to_string());
        }

        if self.quick_max_tokens == 0 || self.comprehensive_max_tokens == 0 {
            return Err("Provider completion budgets must be greater than 0".to_string());
        }

        Ok(())
    }
}
