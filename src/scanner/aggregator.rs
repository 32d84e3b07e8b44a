//! Result collection for one target.
//!
//! The aggregator reads a known number of results rather than waiting for the
//! sink to close, since many workers share the sending side.

use crate::error::{EngineResult, ScanError};
use crate::scanner::orchestrator::ScanPhase;
use crate::scanner::traits::{ScanResult, TargetReport};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::debug;

pub struct ResultAggregator {
    target: String,
    expected: usize,
    retain_closed: bool,
}

impl ResultAggregator {
    pub fn new(target: impl Into<String>, expected: usize) -> Self {
        Self {
            target: target.into(),
            expected,
            retain_closed: false,
        }
    }

    /// Keep closed results as well as open ones.
    pub fn retain_closed(mut self, retain: bool) -> Self {
        self.retain_closed = retain;
        self
    }

    /// Read exactly `expected` results, then wait for every worker to exit.
    ///
    /// The sink closing early means workers died without reporting, which is
    /// surfaced as [`ScanError::ResultCountMismatch`].
    pub async fn collect<T: 'static>(
        self,
        results: &mut mpsc::Receiver<ScanResult>,
        workers: &mut JoinSet<T>,
    ) -> EngineResult<TargetReport> {
        let mut report = TargetReport {
            target: self.target,
            attempted: 0,
            open_count: 0,
            results: Vec::new(),
        };

        while report.attempted < self.expected {
            let Some(result) = results.recv().await else {
                return Err(ScanError::ResultCountMismatch {
                    target: report.target,
                    expected: self.expected,
                    received: report.attempted,
                });
            };

            report.attempted += 1;
            if result.is_open() {
                report.open_count += 1;
                report.results.push(result);
            } else if self.retain_closed {
                report.results.push(result);
            }
        }
        debug!(
            target_host = %report.target,
            phase = %ScanPhase::Collected,
            received = report.attempted,
            "all results read"
        );

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                return Err(ScanError::WorkerFailed {
                    target: report.target,
                    reason: e.to_string(),
                });
            }
        }

        Ok(report)
    }
}
