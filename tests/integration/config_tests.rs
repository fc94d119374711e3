//! Configuration loading integration tests
//!
//! Tests that YAML files, runtime overrides and the scheduler agree on the
//! effective ceilings.

#[cfg(test)]
mod tests {
    use crate::{assert_err, assert_ok};
    use review_gateway::config::{Config, RateLimitOverride, Validate};
    use review_gateway::server::load_config;
    use review_gateway::{GatewayError, RateLimitManager, RequestPriority};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_CONFIG: &str = r#"
server:
  host: "127.0.0.1"
  port: 9100
  cors:
    allowed_origins: ["https://reviews.example.com"]
rate_limit:
  requests_per_minute: 10
  tokens_per_minute: 40000
  requests_per_day: 500
  max_concurrent_requests: 3
  max_queue_size: 20
  caller_daily_share: 5
analysis:
  fallback_confidence_boost: 0.15
  comprehensive_priority: low
provider:
  name: "local"
  base_url: "http://localhost:11434/v1"
  model: "llama3"
logging:
  level: "debug"
  json: true
"#;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_full_config_file_loads() {
        let file = write_config(FULL_CONFIG);
        let config = assert_ok!(Config::from_file(file.path()).await);

        assert_eq!(config.server().address(), "127.0.0.1:9100");
        assert!(!config.server().cors.allows_all_origins());
        assert_eq!(config.rate_limit().max_concurrent_requests, 3);
        assert_eq!(config.rate_limit().caller_daily_cap(), 100);
        assert_eq!(
            config.analysis().comprehensive_priority,
            RequestPriority::Low
        );
        assert_eq!(config.provider().name, "local");
        assert!(config.logging().json);
    }

    #[tokio::test]
    async fn test_scheduler_reports_loaded_ceilings() {
        let file = write_config(FULL_CONFIG);
        let config = assert_ok!(load_config(file.path()).await);
        let scheduler = RateLimitManager::new(config.rate_limit().clone());

        let status = scheduler.status();
        assert_eq!(status.requests_per_minute.limit, 10);
        assert_eq!(status.tokens_per_minute.remaining, 40_000);
        assert_eq!(status.requests_per_day.limit, 500);
        assert_eq!(status.concurrent_requests.limit, 3);
        assert_eq!(status.max_queue_size, 20);
    }

    #[tokio::test]
    async fn test_invalid_provider_url_is_rejected() {
        let file = write_config("provider:\n  base_url: \"ftp://models.example.com\"\n");
        let error = assert_err!(Config::from_file(file.path()).await);
        assert!(matches!(error, GatewayError::Config(msg) if msg.contains("Provider")));
    }

    #[tokio::test]
    async fn test_unparseable_file_is_rejected() {
        let file = write_config("rate_limit: [not, a, map]\n");
        assert!(matches!(
            assert_err!(Config::from_file(file.path()).await),
            GatewayError::Config(_)
        ));
    }

    #[test]
    fn test_override_round_trips_through_scheduler() {
        let scheduler = RateLimitManager::new(Config::default().rate_limit().clone());
        let over: RateLimitOverride =
            serde_json::from_str(r#"{"tokens_per_minute": 5000, "max_queue_size": 0}"#).unwrap();

        let applied = assert_ok!(scheduler.apply_override(&over));
        assert!(applied.validate().is_ok());
        assert_eq!(scheduler.config().tokens_per_minute, 5_000);
        assert_eq!(scheduler.status().max_queue_size, 0);
    }
}
