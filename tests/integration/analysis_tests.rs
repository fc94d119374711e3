//! Progressive analysis integration tests
//!
//! The analyzer runs against a real scheduler; only the model is scripted.

#[cfg(test)]
mod tests {
    use crate::common::{ConfigFactory, DocumentFactory, ScriptedProvider};
    use crate::{assert_err, assert_ok};
    use futures::StreamExt;
    use review_gateway::config::{AnalysisConfig, RateLimitConfig};
    use review_gateway::core::analysis::{AnalysisDepth, AnalysisPhase, AnalysisState};
    use review_gateway::{GatewayError, ProgressiveAnalyzer, RateLimitManager, UserContext};
    use std::sync::Arc;
    use std::time::Duration;

    fn analyzer(
        limits: RateLimitConfig,
        provider: Arc<ScriptedProvider>,
        config: AnalysisConfig,
    ) -> (ProgressiveAnalyzer, RateLimitManager) {
        let scheduler = RateLimitManager::new(limits);
        (
            ProgressiveAnalyzer::new(scheduler.clone(), provider, config),
            scheduler,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_then_final_update() {
        let provider = ScriptedProvider::succeeding(0.55, 0.9);
        let (analyzer, _scheduler) = analyzer(
            ConfigFactory::roomy(),
            provider.clone(),
            ConfigFactory::analysis(),
        );

        let updates: Vec<_> = analyzer
            .run("user-1".to_string(), DocumentFactory::batch(2), UserContext::default())
            .collect()
            .await;

        assert_eq!(updates.len(), 2);
        let mut updates = updates.into_iter();
        let partial = assert_ok!(updates.next().unwrap());
        let complete = assert_ok!(updates.next().unwrap());

        assert_eq!(partial.state, AnalysisState::PartialReady);
        assert_eq!(partial.phase, AnalysisPhase::Quick);
        assert!(!partial.is_final());
        assert_eq!(complete.state, AnalysisState::Complete);
        assert!(complete.is_final());
        assert!(complete.result.confidence >= partial.result.confidence);
        assert!(complete.result.metadata.comprehensive_completed);
        assert_eq!(complete.result.metadata.documents_analyzed, 2);

        assert_eq!(
            provider.calls(),
            vec![AnalysisDepth::Quick, AnalysisDepth::Comprehensive]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_comprehensive_failure_falls_back_to_boosted_partial() {
        let (analyzer, _scheduler) = analyzer(
            ConfigFactory::roomy(),
            ScriptedProvider::failing_comprehensive(0.6),
            ConfigFactory::analysis(),
        );

        let result = assert_ok!(
            analyzer
                .run_to_completion(
                    "user-1".to_string(),
                    vec![DocumentFactory::create()],
                    UserContext::default(),
                )
                .await
        );

        assert!((result.confidence - 0.8).abs() < 1e-9);
        assert!(!result.metadata.comprehensive_completed);
        assert!(result.metadata.fallback_reason.is_some());
        assert_eq!(result.summary, "Quick review of 1 documents");
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_scan_failure_fails_the_run() {
        let provider = ScriptedProvider::failing();
        let (analyzer, _scheduler) = analyzer(
            ConfigFactory::roomy(),
            provider.clone(),
            ConfigFactory::analysis(),
        );

        let outcome = analyzer
            .run_to_completion(
                "user-1".to_string(),
                vec![DocumentFactory::create()],
                UserContext::default(),
            )
            .await;

        assert!(matches!(
            assert_err!(outcome),
            GatewayError::Provider { status: Some(503), .. }
        ));
        assert_eq!(provider.calls(), vec![AnalysisDepth::Quick]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_comprehensive_wait_timeout_degrades_to_partial() {
        // One request per minute: the comprehensive pass cannot start in time
        let (analyzer, scheduler) = analyzer(
            RateLimitConfig {
                requests_per_minute: 1,
                ..ConfigFactory::roomy()
            },
            ScriptedProvider::succeeding(0.5, 0.9),
            ConfigFactory::analysis(),
        );
        let handle = scheduler.start();

        let result = assert_ok!(
            analyzer
                .run_to_completion(
                    "user-1".to_string(),
                    vec![DocumentFactory::create()],
                    UserContext::default(),
                )
                .await
        );

        assert!(!result.metadata.comprehensive_completed);
        assert!((result.confidence - 0.7).abs() < 1e-9);
        let reason = result.metadata.fallback_reason.unwrap();
        assert!(reason.contains("timed out"));

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_documents_still_complete_after_window() {
        let limits = ConfigFactory::fast_tick();
        let config = AnalysisConfig {
            comprehensive_max_wait_ms: 120_000,
            ..ConfigFactory::analysis()
        };
        let (analyzer, scheduler) = analyzer(
            limits,
            ScriptedProvider::succeeding(0.5, 0.9),
            config,
        );
        let handle = scheduler.start();

        let result = assert_ok!(
            analyzer
                .run_to_completion(
                    "user-1".to_string(),
                    vec![DocumentFactory::with_length(200_000)],
                    UserContext::default(),
                )
                .await
        );

        assert!(result.metadata.comprehensive_completed);
        assert!((result.confidence - 0.9).abs() < 1e-9);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_runs_share_one_scheduler() {
        let provider = ScriptedProvider::slow(Duration::from_secs(2));
        let (analyzer, scheduler) = analyzer(
            RateLimitConfig {
                max_concurrent_requests: 1,
                ..ConfigFactory::roomy()
            },
            provider.clone(),
            AnalysisConfig {
                quick_max_wait_ms: 60_000,
                comprehensive_max_wait_ms: 60_000,
                ..AnalysisConfig::default()
            },
        );
        let handle = scheduler.start();

        let runs: Vec<_> = ["user-1", "user-2"]
            .into_iter()
            .map(|caller| {
                let analyzer = analyzer.clone();
                tokio::spawn(async move {
                    analyzer
                        .run_to_completion(
                            caller.to_string(),
                            vec![DocumentFactory::create()],
                            UserContext::default(),
                        )
                        .await
                })
            })
            .collect();

        for run in runs {
            let result = assert_ok!(run.await.unwrap());
            assert!(result.confidence >= 0.5);
        }
        assert_eq!(provider.calls().len(), 4);
        assert_eq!(scheduler.status().active_requests, 0);

        handle.shutdown().await;
    }
}
