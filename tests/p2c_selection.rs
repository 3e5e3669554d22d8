//! Selection properties of the power-of-two-choices strategy.

use std::sync::Arc;

use p2c_balancer::load_balancer::{LoadBalancer, PowerOfTwoChoices, Sampler, SeededSampler};
use p2c_balancer::HealthSet;

mod common;
use common::{health, load, register};

#[test]
fn test_add_then_len_and_single_healthy() {
    let mut lb = PowerOfTwoChoices::new().unwrap();
    register(&mut lb, &["a"]);
    assert_eq!(lb.len(), 1);
    register(&mut lb, &["b", "c"]);
    assert_eq!(lb.len(), 3);

    let picked = lb.next_server(&health(&["b"])).unwrap();
    assert_eq!(picked.name, "b");
}

#[test]
fn test_only_healthy_backends_returned() {
    let mut lb = PowerOfTwoChoices::new().unwrap();
    let names: Vec<String> = (0..12).map(|i| format!("backend-{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let backends = register(&mut lb, &refs);
    for (i, b) in backends.iter().enumerate() {
        load(b, (i * 7) % 5);
    }

    // Every other backend healthy, plus a name nobody registered.
    let mut healthy: Vec<&str> = refs.iter().copied().step_by(2).collect();
    healthy.push("not-registered");
    let set = health(&healthy);

    for _ in 0..5_000 {
        let picked = lb.next_server(&set).unwrap();
        assert!(set.contains(&picked.name), "unhealthy pick {}", picked.name);
        assert!(refs.contains(&picked.name.as_str()));
    }
}

#[test]
fn test_less_loaded_preferred() {
    let mut lb = PowerOfTwoChoices::new().unwrap();
    let backends = register(&mut lb, &["a", "b"]);
    load(&backends[1], 10);
    let set = health(&["a", "b"]);

    let mut picks_a = 0;
    let mut picks_b = 0;
    for _ in 0..10_000 {
        match lb.next_server(&set).unwrap().name.as_str() {
            "a" => picks_a += 1,
            _ => picks_b += 1,
        }
    }
    assert!(picks_a > picks_b, "a={picks_a} b={picks_b}");
}

#[test]
fn test_single_healthy_ignores_load() {
    let mut lb = PowerOfTwoChoices::new().unwrap();
    let backends = register(&mut lb, &["idle", "busy"]);
    load(&backends[1], 1_000);

    for _ in 0..100 {
        assert_eq!(lb.next_server(&health(&["busy"])).unwrap().name, "busy");
    }
}

#[test]
fn test_distribution_boundary_one_vs_two_healthy() {
    // With one healthy name the pick is forced; with two, load decides.
    let mut lb = PowerOfTwoChoices::new().unwrap();
    let backends = register(&mut lb, &["idle", "busy", "down"]);
    load(&backends[1], 5);

    for _ in 0..200 {
        assert_eq!(lb.next_server(&health(&["busy"])).unwrap().name, "busy");
    }

    let mut busy = 0;
    for _ in 0..2_000 {
        if lb.next_server(&health(&["idle", "busy"])).unwrap().name == "busy" {
            busy += 1;
        }
    }
    // Busy is paired with either idle (lighter, healthy) or down (lighter,
    // discarded), so it never wins once a second healthy name exists.
    assert_eq!(busy, 0);
}

#[test]
fn test_unmatched_health_set_errors() {
    let mut lb = PowerOfTwoChoices::new().unwrap();
    register(&mut lb, &["a", "b"]);

    assert!(lb.next_server(&HealthSet::new()).is_err());
    assert!(lb.next_server(&health(&["x", "y", "z"])).is_err());
}

#[test]
fn test_sampler_bound_one() {
    let sampler = SeededSampler::new().unwrap();
    assert_eq!(sampler.int_n(1), 0);
    assert_eq!(sampler.int_n(1), 0);
}

#[test]
fn test_concurrent_selection() {
    let mut lb = PowerOfTwoChoices::new().unwrap();
    register(&mut lb, &["a", "b", "c", "d"]);
    let lb = Arc::new(lb);
    let set = Arc::new(health(&["b", "d"]));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let lb = lb.clone();
            let set = set.clone();
            std::thread::spawn(move || {
                for _ in 0..1_000 {
                    let picked = lb.next_server(&set).unwrap();
                    let guard = picked.track();
                    assert!(guard.name == "b" || guard.name == "d");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert!(lb.backends().iter().all(|b| b.inflight() == 0));
}
