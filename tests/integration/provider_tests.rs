//! LLM provider integration tests
//!
//! A full progressive run against a mock OpenAI-compatible endpoint.

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use crate::common::{ConfigFactory, DocumentFactory};
    use review_gateway::config::ProviderConfig;
    use review_gateway::{
        GatewayError, LlmAnalysisProvider, ProgressiveAnalyzer, RateLimitManager, UserContext,
    };
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion(content: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content.to_string() },
                "finish_reason": "stop"
            }]
        })
    }

    fn analyzer_for(server: &MockServer) -> ProgressiveAnalyzer {
        let provider = LlmAnalysisProvider::new(ProviderConfig {
            name: "mock-llm".to_string(),
            base_url: format!("{}/v1", server.uri()),
            model: "test-model".to_string(),
            quick_max_tokens: 111,
            comprehensive_max_tokens: 999,
            ..ProviderConfig::default()
        })
        .unwrap();

        ProgressiveAnalyzer::new(
            RateLimitManager::new(ConfigFactory::roomy()),
            Arc::new(provider),
            ConfigFactory::analysis(),
        )
    }

    #[tokio::test]
    async fn test_progressive_run_against_http_provider() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({ "max_tokens": 111 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
                "summary": "Quick look",
                "findings": [],
                "recommendations": ["Add an owner"],
                "confidence": 0.4
            }))))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({ "max_tokens": 999 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
                "summary": "Full review",
                "findings": [{
                    "category": "access",
                    "title": "No quarterly review evidence",
                    "description": "Reviews are described but not evidenced.",
                    "severity": "high"
                }],
                "recommendations": [],
                "confidence": 0.85
            }))))
            .expect(1)
            .mount(&server)
            .await;

        let result = assert_ok!(
            analyzer_for(&server)
                .run_to_completion(
                    "user-1".to_string(),
                    vec![DocumentFactory::create()],
                    UserContext::default(),
                )
                .await
        );

        assert_eq!(result.summary, "Full review");
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.recommendations, vec!["Add an owner".to_string()]);
        assert!((result.confidence - 0.85).abs() < 1e-9);
        assert_eq!(result.metadata.provider, "mock-llm");
        assert!(result.metadata.comprehensive_completed);
    }

    #[tokio::test]
    async fn test_upstream_failure_in_second_phase_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({ "max_tokens": 111 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
                "summary": "Quick look",
                "confidence": 0.5
            }))))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({ "max_tokens": 999 })))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let result = assert_ok!(
            analyzer_for(&server)
                .run_to_completion(
                    "user-1".to_string(),
                    vec![DocumentFactory::create()],
                    UserContext::default(),
                )
                .await
        );

        assert_eq!(result.summary, "Quick look");
        assert!((result.confidence - 0.7).abs() < 1e-9);
        assert!(!result.metadata.comprehensive_completed);
        assert!(result.metadata.fallback_reason.unwrap().contains("bad gateway"));
    }

    #[tokio::test]
    async fn test_upstream_failure_in_first_phase_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let outcome = analyzer_for(&server)
            .run_to_completion(
                "user-1".to_string(),
                vec![DocumentFactory::create()],
                UserContext::default(),
            )
            .await;

        match outcome {
            Err(error @ GatewayError::Provider { .. }) => assert!(error.is_retryable()),
            other => panic!("expected provider error, got {:?}", other),
        }
    }
}
