//! Engine data model and the seams workers are generic over.
//!
//! `PortProber` turns one (target, port) pair into a result; `ProgressReporter`
//! receives completion samples. Both are object safe so the orchestrator can
//! hold them behind `Arc<dyn ...>`.

use crate::types::Port;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of probing one port of one target.
///
/// Build it with [`ScanResult::open`] or [`ScanResult::closed`]; a closed
/// result never carries a banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawScanResult")]
pub struct ScanResult {
    target: String,
    port: Port,
    open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    banner: Option<String>,
}

impl ScanResult {
    /// A port that accepted the connection.
    pub fn open(target: impl Into<String>, port: Port, banner: Option<String>) -> Self {
        Self {
            target: target.into(),
            port,
            open: true,
            banner,
        }
    }

    /// A port that refused, timed out, or could not be reached.
    pub fn closed(target: impl Into<String>, port: Port) -> Self {
        Self {
            target: target.into(),
            port,
            open: false,
            banner: None,
        }
    }

    /// Host string the port belongs to.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn port(&self) -> Port {
        self.port
    }

    /// Whether the handshake completed within the timeout.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Bytes the service sent unprompted, trimmed.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }
}

#[derive(Deserialize)]
struct RawScanResult {
    target: String,
    port: Port,
    open: bool,
    #[serde(default)]
    banner: Option<String>,
}

impl TryFrom<RawScanResult> for ScanResult {
    type Error = String;

    fn try_from(raw: RawScanResult) -> Result<Self, Self::Error> {
        if raw.open {
            Ok(Self::open(raw.target, raw.port, raw.banner))
        } else if raw.banner.is_some() {
            Err(format!("closed port {} cannot carry a banner", raw.port))
        } else {
            Ok(Self::closed(raw.target, raw.port))
        }
    }
}

/// Open ports found on one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetTally {
    pub target: String,
    pub open_port_count: usize,
}

/// Aggregate figures for a completed scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Targets in the order they were scanned.
    pub targets: Vec<String>,
    /// Open-port count per target, in scan order.
    pub per_target: Vec<TargetTally>,
    /// Open ports across all targets.
    pub open_port_count: usize,
    /// Connection attempts across all targets.
    pub total_port_count: usize,
    /// Wall-clock time from the first target's start.
    pub elapsed_ms: u64,
    /// Workers per target pool.
    pub worker_count: usize,
    /// Per-operation socket timeout.
    pub timeout_seconds: u64,
    /// When the scan began.
    pub started_at: DateTime<Utc>,
}

impl ScanSummary {
    /// Elapsed time as a `Duration`.
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }
}

/// Everything the engine hands to the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Retained results, grouped by target in scan order.
    pub results: Vec<ScanResult>,
    pub summary: ScanSummary,
}

/// What the aggregator collected for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub target: String,
    /// Results read from the sink; equals the port count on success.
    pub attempted: usize,
    pub open_count: usize,
    /// Open results, plus closed ones when the engine retains them.
    pub results: Vec<ScanResult>,
}

/// Probes a single port of a single target.
///
/// Implementations must always produce a result; failures map to
/// [`ScanResult::closed`].
#[async_trait]
pub trait PortProber: Send + Sync {
    async fn probe(&self, target: &str, port: Port) -> ScanResult;
}

/// Receives progress samples while a target is being scanned.
pub trait ProgressReporter: Send + Sync {
    /// A target's scan is about to dispatch `total` tasks.
    fn begin(&self, _target: &str, _total: usize) {}

    /// `done` of `total` tasks have completed.
    fn update(&self, target: &str, done: usize, total: usize);

    /// The target's scan is done.
    fn finish(&self, _target: &str, _open_count: usize) {}
}

/// Discards every progress sample.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn update(&self, _target: &str, _done: usize, _total: usize) {}
}
