use async_trait::async_trait;
use portsweep::scanner::{
    EngineConfig, PortProber, ProgressReporter, ScanOrchestrator, ScanResult,
};
use portsweep::{Port, ScanError};
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

fn ports(raw: impl IntoIterator<Item = u16>) -> Vec<Port> {
    raw.into_iter().filter_map(Port::new).collect()
}

fn targets(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Reports even ports open with a banner, odd ports closed, after a short
/// port-dependent delay so completion order differs from dispatch order.
#[derive(Default)]
struct EvenPortsOpen {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl PortProber for EvenPortsOpen {
    async fn probe(&self, target: &str, port: Port) -> ScanResult {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = u64::from(port.as_u16() % 4);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if port.as_u16() % 2 == 0 {
            ScanResult::open(target, port, Some(format!("svc-{}", port)))
        } else {
            ScanResult::closed(target, port)
        }
    }
}

struct PanicOnFirstPort;

#[async_trait]
impl PortProber for PanicOnFirstPort {
    async fn probe(&self, _target: &str, port: Port) -> ScanResult {
        panic!("probe of port {} blew up", port);
    }
}

#[derive(Default)]
struct RecordingReporter {
    events: Mutex<Vec<String>>,
    samples: Mutex<Vec<(String, usize, usize)>>,
}

impl ProgressReporter for RecordingReporter {
    fn begin(&self, target: &str, total: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("begin {} {}", target, total));
    }

    fn update(&self, target: &str, done: usize, total: usize) {
        self.samples
            .lock()
            .unwrap()
            .push((target.to_string(), done, total));
    }

    fn finish(&self, target: &str, open_count: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("finish {} {}", target, open_count));
    }
}

/// A loopback port with nothing listening on it.
async fn unused_port() -> Port {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    Port::new(port).unwrap()
}

#[tokio::test]
async fn every_port_yields_exactly_one_result_for_any_worker_count() {
    let port_list = ports(1..=40);

    for workers in [1, 2, 7, 40, 45] {
        let config = EngineConfig::new(workers, Duration::from_secs(1)).with_closed();
        let orchestrator =
            ScanOrchestrator::with_prober(config, Arc::new(EvenPortsOpen::default())).unwrap();

        let report = orchestrator.run(&targets(&["host"]), &port_list).await.unwrap();

        assert_eq!(report.results.len(), port_list.len(), "workers = {}", workers);
        let unique: HashSet<Port> = report.results.iter().map(|r| r.port()).collect();
        assert_eq!(unique.len(), port_list.len(), "workers = {}", workers);
        assert_eq!(report.summary.total_port_count, 40);
        assert_eq!(report.summary.open_port_count, 20);
        assert_eq!(report.summary.worker_count, workers);
    }
}

#[tokio::test]
async fn closed_results_never_carry_a_banner() {
    let config = EngineConfig::new(8, Duration::from_secs(1)).with_closed();
    let orchestrator =
        ScanOrchestrator::with_prober(config, Arc::new(EvenPortsOpen::default())).unwrap();

    let report = orchestrator
        .run(&targets(&["host"]), &ports(1..=30))
        .await
        .unwrap();

    for result in &report.results {
        if result.is_open() {
            assert!(result.banner().is_some());
        } else {
            assert_eq!(result.banner(), None);
        }
    }
}

#[tokio::test]
async fn open_set_does_not_depend_on_worker_count() {
    let port_list = ports(1..=60);
    let mut sets = Vec::new();

    for workers in [1, 4, 100] {
        let config = EngineConfig::new(workers, Duration::from_secs(1));
        let orchestrator =
            ScanOrchestrator::with_prober(config, Arc::new(EvenPortsOpen::default())).unwrap();
        let report = orchestrator.run(&targets(&["host"]), &port_list).await.unwrap();

        assert!(report.results.iter().all(|r| r.is_open()));
        let open: BTreeSet<u16> = report.results.iter().map(|r| r.port().as_u16()).collect();
        sets.push(open);
    }

    assert!(sets.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(sets[0].len(), 30);
}

#[tokio::test]
async fn single_worker_serializes_all_tasks() {
    let prober = Arc::new(EvenPortsOpen::default());
    let config = EngineConfig::new(1, Duration::from_secs(1)).with_closed();
    let orchestrator = ScanOrchestrator::with_prober(config, prober.clone()).unwrap();

    let report = orchestrator
        .run(&targets(&["host"]), &ports([1, 2, 3]))
        .await
        .unwrap();

    let mut seen: Vec<u16> = report.results.iter().map(|r| r.port().as_u16()).collect();
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(prober.peak.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrency_never_exceeds_worker_count() {
    let prober = Arc::new(EvenPortsOpen::default());
    let config = EngineConfig::new(5, Duration::from_secs(1));
    let orchestrator = ScanOrchestrator::with_prober(config, prober.clone()).unwrap();

    orchestrator
        .run(&targets(&["host"]), &ports(1..=200))
        .await
        .unwrap();

    assert!(prober.peak.load(Ordering::SeqCst) <= 5);
}

#[tokio::test]
async fn empty_port_list_completes_immediately() {
    let config = EngineConfig::new(10, Duration::from_secs(1));
    let orchestrator = ScanOrchestrator::new(config).unwrap();

    let report = tokio::time::timeout(
        Duration::from_secs(2),
        orchestrator.run(&targets(&["localhost", "127.0.0.1"]), &[]),
    )
    .await
    .expect("empty scan must not block")
    .unwrap();

    assert!(report.results.is_empty());
    assert_eq!(report.summary.total_port_count, 0);
    assert_eq!(report.summary.open_port_count, 0);
    assert_eq!(report.summary.targets, targets(&["localhost", "127.0.0.1"]));
}

#[tokio::test]
async fn targets_are_scanned_in_order_with_fresh_pools() {
    let reporter = Arc::new(RecordingReporter::default());
    let config = EngineConfig::new(3, Duration::from_secs(1));
    let orchestrator = ScanOrchestrator::with_prober(config, Arc::new(EvenPortsOpen::default()))
        .unwrap()
        .with_reporter(reporter.clone());

    let report = orchestrator
        .run(&targets(&["alpha", "beta"]), &ports(1..=10))
        .await
        .unwrap();

    assert_eq!(report.summary.total_port_count, 20);
    assert_eq!(report.summary.open_port_count, 10);

    let order: Vec<&str> = report.results.iter().map(|r| r.target()).collect();
    let first_beta = order.iter().position(|t| *t == "beta").unwrap();
    assert!(order[..first_beta].iter().all(|t| *t == "alpha"));
    assert!(order[first_beta..].iter().all(|t| *t == "beta"));

    assert_eq!(
        *reporter.events.lock().unwrap(),
        vec!["begin alpha 10", "finish alpha 5", "begin beta 10", "finish beta 5"]
    );

    let tallies: Vec<(&str, usize)> = report
        .summary
        .per_target
        .iter()
        .map(|t| (t.target.as_str(), t.open_port_count))
        .collect();
    assert_eq!(tallies, vec![("alpha", 5), ("beta", 5)]);

    let samples = reporter.samples.lock().unwrap();
    for target in ["alpha", "beta"] {
        let progress: Vec<usize> = samples
            .iter()
            .filter(|(t, _, _)| t == target)
            .map(|(_, done, total)| {
                assert!(done <= total);
                *done
            })
            .collect();
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(progress.last(), Some(&10));
    }
}

#[tokio::test]
async fn worker_count_beyond_task_count_is_capped() {
    let workers = usize::MAX >> 2;
    let prober = Arc::new(EvenPortsOpen::default());
    let config = EngineConfig::new(workers, Duration::from_secs(1)).with_closed();
    let orchestrator = ScanOrchestrator::with_prober(config, prober.clone()).unwrap();

    let empty = orchestrator.run(&targets(&["127.0.0.1"]), &[]).await.unwrap();
    assert!(empty.results.is_empty());
    assert_eq!(empty.summary.total_port_count, 0);

    let report = orchestrator
        .run(&targets(&["host"]), &ports([10, 11, 12]))
        .await
        .unwrap();
    assert_eq!(report.results.len(), 3);
    assert_eq!(report.summary.open_port_count, 2);
    assert_eq!(report.summary.worker_count, workers);
    assert!(prober.peak.load(Ordering::SeqCst) <= 3);
}

#[tokio::test]
async fn duplicate_ports_each_yield_a_result() {
    let config = EngineConfig::new(2, Duration::from_secs(1)).with_closed();
    let orchestrator =
        ScanOrchestrator::with_prober(config, Arc::new(EvenPortsOpen::default())).unwrap();

    let report = orchestrator
        .run(&targets(&["host"]), &ports([8, 8, 8]))
        .await
        .unwrap();

    assert_eq!(report.results.len(), 3);
    assert!(report.results.iter().all(|r| r.port().as_u16() == 8));
    assert_eq!(report.summary.total_port_count, 3);
    assert_eq!(report.summary.open_port_count, 3);
}

#[tokio::test]
async fn empty_target_list_yields_zero_summary() {
    let reporter = Arc::new(RecordingReporter::default());
    let config = EngineConfig::new(4, Duration::from_secs(1));
    let orchestrator = ScanOrchestrator::with_prober(config, Arc::new(EvenPortsOpen::default()))
        .unwrap()
        .with_reporter(reporter.clone());

    let report = orchestrator.run(&[], &ports(1..=10)).await.unwrap();

    assert!(report.results.is_empty());
    assert!(report.summary.targets.is_empty());
    assert!(report.summary.per_target.is_empty());
    assert_eq!(report.summary.open_port_count, 0);
    assert_eq!(report.summary.total_port_count, 0);
    assert!(reporter.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn panicking_prober_is_an_engine_error() {
    let config = EngineConfig::new(1, Duration::from_secs(1));
    let orchestrator = ScanOrchestrator::with_prober(config, Arc::new(PanicOnFirstPort)).unwrap();

    let err = orchestrator
        .run(&targets(&["host"]), &ports(1..=5))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ScanError::ResultCountMismatch { .. } | ScanError::WorkerFailed { .. }
    ));
}

#[tokio::test]
async fn zero_workers_is_rejected() {
    let config = EngineConfig::new(0, Duration::from_secs(1));
    assert!(matches!(
        ScanOrchestrator::new(config),
        Err(ScanError::InvalidConfig(_))
    ));
}

#[tokio::test]
async fn nothing_listening_yields_one_closed_result() {
    let port = unused_port().await;
    let config = EngineConfig::new(5, Duration::from_secs(1)).with_closed();
    let orchestrator = ScanOrchestrator::new(config).unwrap();

    let report = orchestrator
        .run(&targets(&["localhost"]), &[port])
        .await
        .unwrap();

    assert_eq!(report.results, vec![ScanResult::closed("localhost", port)]);
    assert_eq!(report.summary.open_port_count, 0);
    assert_eq!(report.summary.total_port_count, 1);
    assert_eq!(report.summary.timeout_seconds, 1);
}

#[tokio::test]
async fn refusing_target_reports_nothing_open_on_every_run() {
    let port_list = vec![unused_port().await, unused_port().await];
    let config = EngineConfig::new(4, Duration::from_secs(1));
    let orchestrator = ScanOrchestrator::new(config).unwrap();

    for _ in 0..2 {
        let report = orchestrator
            .run(&targets(&["127.0.0.1"]), &port_list)
            .await
            .unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.summary.open_port_count, 0);
        assert_eq!(report.summary.total_port_count, 2);
    }
}

#[tokio::test]
async fn greeting_service_banner_is_captured() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = Port::new(listener.local_addr().unwrap().port()).unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let _ = socket.write_all(b"HELLO\n").await;
        }
    });

    let config = EngineConfig::new(5, Duration::from_secs(1));
    let orchestrator = ScanOrchestrator::new(config).unwrap();
    let closed = unused_port().await;

    let report = orchestrator
        .run(&targets(&["127.0.0.1"]), &[port, closed])
        .await
        .unwrap();

    assert_eq!(
        report.results,
        vec![ScanResult::open("127.0.0.1", port, Some("HELLO".to_string()))]
    );
    assert_eq!(report.summary.open_port_count, 1);
    assert_eq!(report.summary.total_port_count, 2);
}
