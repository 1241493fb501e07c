//! End-to-end probe rounds against local mock backends.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use server_health_monitor::config::{ProbeConfig, PublishPolicy, SchedulerConfig};
use server_health_monitor::history::{HistoryWriter, MemoryHistory};
use server_health_monitor::scheduler::RoundState;
use server_health_monitor::{Aggregator, Checker, MonitorService, Scheduler, SnapshotStore};

mod common;

fn checker() -> Checker {
    Checker::new(&ProbeConfig {
        use_system_proxy: false,
        ..ProbeConfig::default()
    })
    .unwrap()
}

struct Harness {
    scheduler: Scheduler,
    store: Arc<SnapshotStore>,
    history: MemoryHistory,
}

fn harness(targets: Vec<String>, timeout_ms: u64, policy: PublishPolicy) -> Harness {
    let history = MemoryHistory::new();
    let store = Arc::new(SnapshotStore::new(policy));
    let (writer, _) = HistoryWriter::spawn(Arc::new(history.clone()), 64);
    let aggregator = Arc::new(Aggregator::new(checker(), writer));
    let config = SchedulerConfig {
        interval_secs: 3600,
        probe_timeout_ms: timeout_ms,
        publish_policy: policy,
    };
    Harness {
        scheduler: Scheduler::new(aggregator, store.clone(), targets, &config),
        store,
        history,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_round_reports_each_target() {
    let up = common::url(common::start_backend(200, Duration::from_millis(50)).await);
    let down = common::url(common::refused_addr().await);
    let timeout = Duration::from_millis(500);

    let h = harness(vec![up.clone(), down.clone()], 500, PublishPolicy::LastWriterWins);
    let outcome = h.scheduler.run_round().await;
    assert_eq!(outcome.state, RoundState::Complete { published: true });

    let view = h.store.read();
    let snapshot = view.snapshot().expect("round was published");
    assert_eq!(snapshot.len(), 2);

    let up_result = snapshot.get(&up).expect("result for the healthy target");
    assert!(up_result.reachable);
    assert!(up_result.latency >= Duration::from_millis(45));
    assert!(up_result.latency <= timeout);

    let down_result = snapshot.get(&down).expect("result for the refused target");
    assert!(!down_result.reachable);
    assert!(down_result.latency <= timeout);

    common::wait_until(|| h.history.len() == 2).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_hanging_target_is_cut_off_at_timeout() {
    let hang = common::url(common::start_backend(200, Duration::from_secs(2)).await);
    let up = common::url(common::start_backend(200, Duration::ZERO).await);
    let timeout = Duration::from_millis(500);

    let h = harness(vec![hang.clone(), up.clone()], 500, PublishPolicy::LastWriterWins);

    let started = Instant::now();
    h.scheduler.run_round().await;
    let elapsed = started.elapsed();

    assert!(elapsed < Duration::from_millis(1200), "round took {:?}", elapsed);

    let view = h.store.read();
    let snapshot = view.snapshot().unwrap();
    let hang_result = snapshot.get(&hang).unwrap();
    assert!(!hang_result.reachable);
    assert!(hang_result.latency >= Duration::from_millis(450));
    assert!(hang_result.latency <= timeout);
    assert!(snapshot.get(&up).unwrap().reachable);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_target_gets_exactly_one_entry() {
    let ok_a = common::url(common::start_backend(200, Duration::ZERO).await);
    let failing = common::url(common::start_backend(500, Duration::ZERO).await);
    let refused = common::url(common::refused_addr().await);
    let ok_b = common::url(common::start_backend(200, Duration::from_millis(20)).await);
    let targets = vec![
        ok_a.clone(),
        failing.clone(),
        refused.clone(),
        "not a url".to_string(),
        ok_b.clone(),
    ];

    let h = harness(targets.clone(), 500, PublishPolicy::LastWriterWins);
    let outcome = h.scheduler.run_round().await;
    assert_eq!(outcome.results, targets.len());

    let view = h.store.read();
    let snapshot = view.snapshot().unwrap();
    let order: Vec<&str> = snapshot.results().iter().map(|r| r.target.as_str()).collect();
    assert_eq!(order, targets.iter().map(String::as_str).collect::<Vec<_>>());

    let up: Vec<bool> = snapshot.results().iter().map(|r| r.reachable).collect();
    assert_eq!(up, vec![true, false, false, false, true]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_history_is_newest_first_across_rounds() {
    let up = common::url(common::start_backend(200, Duration::ZERO).await);
    let h = harness(vec![up.clone()], 500, PublishPolicy::LastWriterWins);
    let service = MonitorService::new(h.store.clone(), Arc::new(h.history.clone()), 0);

    h.scheduler.run_round().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    h.scheduler.run_round().await;
    common::wait_until(|| h.history.len() == 2).await;

    let latest = h.store.read().snapshot().unwrap().get(&up).unwrap().clone();
    let history = service.get_history(&up).await.unwrap();

    assert_eq!(history.len(), 2);
    assert!(history[0].timestamp > history[1].timestamp);
    assert_eq!(history[0], latest);
}

/// Backend whose first response takes 600ms and every later one is instant.
async fn slow_then_fast_backend() -> String {
    let calls = Arc::new(AtomicU32::new(0));
    let addr = common::start_programmable_backend(move || {
        let calls = calls.clone();
        async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(600)).await;
            }
            (200, "ok".to_string())
        }
    })
    .await;
    common::url(addr)
}

async fn overlapping_rounds(policy: PublishPolicy) -> (Arc<SnapshotStore>, RoundState, RoundState) {
    let target = slow_then_fast_backend().await;
    let h = harness(vec![target], 2000, policy);

    let first = h.scheduler.clone();
    let slow_round = tokio::spawn(async move { first.run_round().await });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let fast = h.scheduler.run_round().await;
    assert_eq!(fast.sequence, 2);
    let slow = slow_round.await.unwrap();
    assert_eq!(slow.sequence, 1);

    (h.store, slow.state, fast.state)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlap_last_writer_wins() {
    let (store, slow, fast) = overlapping_rounds(PublishPolicy::LastWriterWins).await;

    assert_eq!(fast, RoundState::Complete { published: true });
    assert_eq!(slow, RoundState::Complete { published: true });
    assert_eq!(store.read().snapshot().unwrap().sequence(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlap_monotonic_keeps_newer_round() {
    let (store, slow, fast) = overlapping_rounds(PublishPolicy::Monotonic).await;

    assert_eq!(fast, RoundState::Complete { published: true });
    assert_eq!(slow, RoundState::Complete { published: false });
    assert_eq!(store.read().snapshot().unwrap().sequence(), 2);
}
