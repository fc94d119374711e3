//! Scheduler integration tests
//!
//! These drive a started scheduler through its public API only. Time is
//! paused, so waits on the one-minute window complete instantly.

#[cfg(test)]
mod tests {
    use crate::common::ConfigFactory;
    use crate::{assert_err, assert_ok};
    use parking_lot::Mutex;
    use review_gateway::config::RateLimitConfig;
    use review_gateway::{GatewayError, RateLimitManager, RequestPriority, SubmitOptions};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::oneshot;
    use tokio::task::JoinHandle;
    use tokio::time::{Instant, sleep};

    /// Let spawned submissions reach the scheduler
    async fn settle() {
        sleep(Duration::from_millis(1)).await;
    }

    /// Occupies a concurrency slot until `release` fires
    fn occupy(manager: &RateLimitManager) -> (oneshot::Sender<()>, JoinHandle<()>) {
        let (release, gate) = oneshot::channel::<()>();
        let manager = manager.clone();
        let task = tokio::spawn(async move {
            let outcome = manager
                .submit(
                    "holder",
                    async move {
                        let _ = gate.await;
                        Ok(())
                    },
                    SubmitOptions::default(),
                )
                .await;
            assert!(outcome.is_ok());
        });
        (release, task)
    }

    fn record(
        manager: &RateLimitManager,
        caller: &'static str,
        priority: RequestPriority,
        order: &Arc<Mutex<Vec<&'static str>>>,
    ) -> JoinHandle<Result<(), GatewayError>> {
        let manager = manager.clone();
        let order = order.clone();
        tokio::spawn(async move {
            manager
                .submit(
                    caller,
                    async move {
                        order.lock().push(caller);
                        Ok(())
                    },
                    SubmitOptions::new(priority, 10),
                )
                .await
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_request_runs_after_slot_frees() {
        let manager = RateLimitManager::new(ConfigFactory::tight());
        let handle = manager.start();
        let (release, holder) = occupy(&manager);
        settle().await;

        let waiting = {
            let manager = manager.clone();
            tokio::spawn(async move {
                manager
                    .submit("user-1", async { Ok("done") }, SubmitOptions::default())
                    .await
            })
        };
        settle().await;

        assert_eq!(manager.queue_position("user-1"), Some(1));
        assert_eq!(manager.status().queue_length, 1);

        release.send(()).unwrap();
        holder.await.unwrap();
        assert_eq!(assert_ok!(waiting.await.unwrap()), "done");
        assert_eq!(manager.queue_position("user-1"), None);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_queue_drains_in_priority_order() {
        let manager = RateLimitManager::new(RateLimitConfig {
            max_queue_size: 10,
            ..ConfigFactory::tight()
        });
        let handle = manager.start();
        let (release, holder) = occupy(&manager);
        settle().await;

        let order = Arc::new(Mutex::new(Vec::new()));
        let low = record(&manager, "low", RequestPriority::Low, &order);
        settle().await;
        let medium = record(&manager, "medium", RequestPriority::Medium, &order);
        settle().await;
        let high = record(&manager, "high", RequestPriority::High, &order);
        settle().await;
        assert_eq!(manager.status().queue_length, 3);

        release.send(()).unwrap();
        holder.await.unwrap();
        for task in [low, medium, high] {
            assert_ok!(task.await.unwrap());
        }

        assert_eq!(*order.lock(), vec!["high", "medium", "low"]);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_minute_ceiling_defers_to_next_window() {
        let manager = RateLimitManager::new(RateLimitConfig {
            requests_per_minute: 2,
            max_queue_size: 10,
            ..ConfigFactory::roomy()
        });
        let handle = manager.start();
        let started = Instant::now();

        let tasks: Vec<_> = (0..3)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move {
                    manager
                        .submit("burst", async { Ok(Instant::now()) }, SubmitOptions::default())
                        .await
                })
            })
            .collect();

        let mut finished = Vec::new();
        for task in tasks {
            finished.push(assert_ok!(task.await.unwrap()));
        }
        finished.sort();

        assert!(finished[1].duration_since(started) < Duration::from_secs(1));
        assert!(finished[2].duration_since(started) >= Duration::from_secs(60));
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_timeout_rejects_and_empties_queue() {
        let manager = RateLimitManager::new(ConfigFactory::tight());
        let handle = manager.start();
        let (_release, _holder) = occupy(&manager);
        settle().await;

        let outcome = manager
            .submit(
                "impatient",
                async { Ok(()) },
                SubmitOptions::default().with_max_wait(Duration::from_millis(200)),
            )
            .await;

        match assert_err!(outcome) {
            GatewayError::RequestTimeout { waited_ms } => assert!(waited_ms >= 200),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert_eq!(manager.status().queue_length, 0);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_daily_cap_is_per_caller() {
        let manager = RateLimitManager::new(RateLimitConfig {
            requests_per_day: 20,
            caller_daily_share: 10,
            ..ConfigFactory::roomy()
        });

        for _ in 0..2 {
            assert_ok!(manager.submit("heavy", async { Ok(()) }, SubmitOptions::default()).await);
        }

        let rejected = manager
            .submit("heavy", async { Ok(()) }, SubmitOptions::default())
            .await;
        assert!(matches!(
            assert_err!(rejected),
            GatewayError::DailyLimitExceeded { limit: 2, .. }
        ));

        assert_ok!(manager.submit("light", async { Ok(()) }, SubmitOptions::default()).await);
        assert_eq!(manager.status().requests_per_day.used, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_circuit_breaker_sheds_load_without_touching_running_work() {
        let manager = RateLimitManager::new(ConfigFactory::tight());
        let (release, holder) = occupy(&manager);
        settle().await;

        manager.set_circuit_breaker(true);
        let shed = manager
            .submit("user-1", async { Ok(()) }, SubmitOptions::default())
            .await;
        assert!(matches!(
            assert_err!(shed),
            GatewayError::Overloaded { max_queue_size: 0, .. }
        ));

        release.send(()).unwrap();
        holder.await.unwrap();

        manager.set_circuit_breaker(false);
        assert_ok!(manager.submit("user-1", async { Ok(()) }, SubmitOptions::default()).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_rejects_everything_queued() {
        let manager = RateLimitManager::new(ConfigFactory::tight());
        let handle = manager.start();
        let (_release, _holder) = occupy(&manager);
        settle().await;

        let queued: Vec<_> = ["a", "b"]
            .into_iter()
            .map(|caller| {
                let manager = manager.clone();
                tokio::spawn(async move {
                    manager
                        .submit(caller, async { Ok(()) }, SubmitOptions::default())
                        .await
                })
            })
            .collect();
        settle().await;

        assert_eq!(handle.shutdown().await, 2);
        for task in queued {
            assert!(matches!(
                assert_err!(task.await.unwrap()),
                GatewayError::Shutdown(_)
            ));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_estimates_wait_for_queued_work() {
        let manager = RateLimitManager::new(ConfigFactory::tight());
        let (_release, _holder) = occupy(&manager);
        settle().await;
        assert_eq!(manager.status().estimated_wait_ms, 0);

        let _queued = {
            let manager = manager.clone();
            tokio::spawn(async move {
                manager
                    .submit("user-1", async { Ok(()) }, SubmitOptions::default())
                    .await
            })
        };
        settle().await;

        let status = manager.status();
        assert_eq!(status.queue_length, 1);
        assert_eq!(status.active_requests, 1);
        assert!(status.estimated_wait_ms > 0);
    }
}
