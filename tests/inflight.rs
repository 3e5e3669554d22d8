//! In-flight bookkeeping under concurrency.

use std::sync::Arc;
use std::time::Duration;

use p2c_balancer::config::{BackendConfig, BalancerConfig};
use p2c_balancer::load_balancer::{Backend, BackendPool, Strategy};
use p2c_balancer::HealthTracker;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inc_dec_is_lossless() {
    let backend = Arc::new(Backend::new("a"));
    backend.inc_inflight();
    backend.inc_inflight();

    let mut tasks = Vec::new();
    for _ in 0..64 {
        let backend = backend.clone();
        tasks.push(tokio::spawn(async move {
            for _ in 0..500 {
                backend.inc_inflight();
                tokio::task::yield_now().await;
                backend.dec_inflight();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(backend.inflight(), 2);
}

#[tokio::test]
async fn test_cancelled_request_releases_guard() {
    let backend = Arc::new(Backend::new("a"));

    let guarded = backend.clone();
    let request = tokio::spawn(async move {
        let _guard = guarded.track();
        tokio::time::sleep(Duration::from_secs(60)).await;
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(backend.inflight(), 1);

    request.abort();
    let _ = request.await;
    assert_eq!(backend.inflight(), 0);
}

#[tokio::test]
async fn test_pool_load_steers_p2c() {
    let config = BalancerConfig {
        strategy: Strategy::PowerOfTwoChoices,
        backends: ["a", "b"]
            .iter()
            .map(|name| BackendConfig {
                name: name.to_string(),
                weight: 1,
            })
            .collect(),
        ..Default::default()
    };
    let pool = BackendPool::from_config(&config).unwrap();
    let tracker = HealthTracker::new(["a", "b"].into_iter().collect());

    // Holding a guard makes its backend the heavier one for the next pick.
    let first = pool.get(&tracker.snapshot()).unwrap();
    let second = pool.get(&tracker.snapshot()).unwrap();
    assert_ne!(first.name, second.name);

    tracker.set_healthy(&second.name, false);
    let third = pool.get(&tracker.snapshot()).unwrap();
    assert_eq!(third.name, first.name);
    assert_eq!(first.inflight(), 2);
}
