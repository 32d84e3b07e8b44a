//! Multi-target scan loop.
//!
//! Targets are scanned strictly one after another. Each gets a fresh task
//! source, worker pool, progress tracker and aggregator; nothing but the port
//! list is shared between targets.

use crate::error::EngineResult;
use crate::scanner::aggregator::ResultAggregator;
use crate::scanner::progress::{CompletionCounter, ProgressTracker};
use crate::scanner::task_source::TaskSource;
use crate::scanner::tcp::TcpProber;
use crate::scanner::traits::{
    PortProber, ProgressReporter, ScanReport, ScanSummary, SilentReporter, TargetReport,
    TargetTally,
};
use crate::scanner::worker::Worker;
use crate::scanner::EngineConfig;
use crate::types::Port;
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Lifecycle of a single target's scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    /// Ports are being pushed while workers drain concurrently.
    Dispatching,
    /// Task source closed; workers finish in-flight tasks.
    Draining,
    /// Every result has been read.
    Collected,
    Done,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Dispatching => write!(f, "dispatching"),
            Self::Draining => write!(f, "draining"),
            Self::Collected => write!(f, "collected"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Runs a scan across an ordered target list.
pub struct ScanOrchestrator {
    config: EngineConfig,
    prober: Arc<dyn PortProber>,
    reporter: Arc<dyn ProgressReporter>,
}

impl ScanOrchestrator {
    /// Create an orchestrator that probes with real TCP connections.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let prober = Arc::new(TcpProber::new(config.timeout));
        Self::with_prober(config, prober)
    }

    /// Create an orchestrator around a custom prober.
    pub fn with_prober(config: EngineConfig, prober: Arc<dyn PortProber>) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            prober,
            reporter: Arc::new(SilentReporter),
        })
    }

    /// Send progress samples to `reporter`.
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Scan every target against `ports` and assemble the report.
    pub async fn run(&self, targets: &[String], ports: &[Port]) -> EngineResult<ScanReport> {
        let started_at = Utc::now();
        let clock = Instant::now();
        let ports: Arc<[Port]> = Arc::from(ports);

        let mut results = Vec::new();
        let mut per_target = Vec::with_capacity(targets.len());
        let mut open_port_count = 0;
        let mut total_port_count = 0;

        for target in targets {
            let report = self.scan_target(target, Arc::clone(&ports)).await?;
            open_port_count += report.open_count;
            total_port_count += report.attempted;
            per_target.push(TargetTally {
                target: report.target,
                open_port_count: report.open_count,
            });
            results.extend(report.results);
        }

        let summary = ScanSummary {
            targets: targets.to_vec(),
            per_target,
            open_port_count,
            total_port_count,
            elapsed_ms: u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX),
            worker_count: self.config.workers,
            timeout_seconds: self.config.timeout.as_secs(),
            started_at,
        };

        info!(
            targets = summary.targets.len(),
            open = summary.open_port_count,
            attempted = summary.total_port_count,
            elapsed_ms = summary.elapsed_ms,
            "scan complete"
        );

        Ok(ScanReport { results, summary })
    }

    /// Scan one target to completion with its own pool.
    pub async fn scan_target(&self, target: &str, ports: Arc<[Port]>) -> EngineResult<TargetReport> {
        let total = ports.len();
        // A pool larger than the task list would only idle.
        let workers = self.config.workers.min(total).max(1);
        debug!(target_host = target, phase = %ScanPhase::Idle, total, workers);
        info!(target_host = target, ports = total, "scanning target");

        let counter = Arc::new(CompletionCounter::new());
        // Sized to the task count so publishing never blocks.
        let (result_tx, mut result_rx) = mpsc::channel(total.max(1));

        self.reporter.begin(target, total);
        let (tasks, feeder) = TaskSource::spawn(ports, workers);
        debug!(target_host = target, phase = %ScanPhase::Dispatching);

        let target_name: Arc<str> = Arc::from(target);
        let mut pool = JoinSet::new();
        for id in 0..workers {
            let worker = Worker {
                id,
                target: Arc::clone(&target_name),
                tasks: tasks.clone(),
                results: result_tx.clone(),
                counter: Arc::clone(&counter),
                prober: Arc::clone(&self.prober),
            };
            pool.spawn(worker.run());
        }
        // Workers now own every sender; the sink closes only if they all exit.
        drop(result_tx);
        drop(tasks);

        let (finished_tx, finished_rx) = oneshot::channel();
        let tracker = tokio::spawn(
            ProgressTracker::new(
                target,
                total,
                Arc::clone(&counter),
                Arc::clone(&self.reporter),
            )
            .run(finished_rx),
        );

        // The feeder cannot stall: workers never block on the sink, and if they
        // all exit the channel send fails.
        match feeder.await {
            Ok(dispatched) => {
                debug!(target_host = target, phase = %ScanPhase::Draining, dispatched)
            }
            Err(e) => warn!(target_host = target, error = %e, "task feeder did not finish"),
        }

        let outcome = ResultAggregator::new(target, total)
            .retain_closed(self.config.retain_closed)
            .collect(&mut result_rx, &mut pool)
            .await;

        let _ = finished_tx.send(());
        if let Err(e) = tracker.await {
            warn!(target_host = target, error = %e, "progress tracker did not finish");
        }

        let report = outcome?;
        self.reporter.finish(target, report.open_count);
        debug!(target_host = target, phase = %ScanPhase::Done, open = report.open_count);
        info!(target_host = target, open = report.open_count, "target finished");

        Ok(report)
    }
}
