//! Error types for portsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Connection failures are
//! never errors here; they become closed results inside the engine.

use crate::types::{PortError, TargetError};
use std::path::PathBuf;
use thiserror::Error;

/// Engine-level failures.
///
/// Every task produces exactly one result when the components honor their
/// contracts, so these indicate a defect rather than a network condition.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("result sink for {target} closed after {received} of {expected} results")]
    ResultCountMismatch {
        target: String,
        expected: usize,
        received: usize,
    },

    #[error("worker for {target} did not exit cleanly: {reason}")]
    WorkerFailed { target: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, ScanError>;

/// Result type alias for settings operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
