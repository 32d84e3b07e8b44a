//! Scanner module - the concurrent scan engine.
//!
//! For each target the orchestrator wires a bounded task source into a fixed
//! pool of tokio workers. Workers probe ports through a [`PortProber`] and
//! publish into a result sink sized to the task count. An aggregator reads
//! exactly that many results while a tracker samples the completion counter.

pub mod aggregator;
pub mod orchestrator;
pub mod progress;
pub mod task_source;
pub mod tcp;
pub mod traits;
mod worker;

pub use aggregator::ResultAggregator;
pub use orchestrator::{ScanOrchestrator, ScanPhase};
pub use progress::{CompletionCounter, ProgressTracker, PROGRESS_INTERVAL};
pub use task_source::TaskSource;
pub use tcp::{ConnectionOutcome, Connector, TcpProber};
pub use traits::{
    PortProber, ProgressReporter, ScanReport, ScanResult, ScanSummary, SilentReporter,
    TargetReport, TargetTally,
};

use crate::error::{EngineResult, ScanError};
use crate::types::Port;
use std::sync::Arc;
use std::time::Duration;

/// Default number of workers per target.
pub const DEFAULT_WORKERS: usize = 100;

/// Default per-operation timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings the engine runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Workers in each target's pool.
    pub workers: usize,
    /// Applied to every connect and every banner read.
    pub timeout: Duration,
    /// Keep closed results in the report as well as open ones.
    pub retain_closed: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
            retain_closed: false,
        }
    }
}

impl EngineConfig {
    pub fn new(workers: usize, timeout: Duration) -> Self {
        Self {
            workers,
            timeout,
            retain_closed: false,
        }
    }

    /// Keep closed results in the report.
    pub fn with_closed(mut self) -> Self {
        self.retain_closed = true;
        self
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> EngineResult<()> {
        if self.workers == 0 {
            return Err(ScanError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ScanError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Scan `targets` × `ports` with real TCP connections.
pub async fn run_scan(
    targets: &[String],
    ports: &[Port],
    config: EngineConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> EngineResult<ScanReport> {
    ScanOrchestrator::new(config)?
        .with_reporter(reporter)
        .run(targets, ports)
        .await
}
