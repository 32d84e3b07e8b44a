//! # portsweep - A Concurrent TCP Port Scanner
//!
//! portsweep probes a list of targets across a list of TCP ports, reports
//! which ports accept a connection within a timeout, and captures whatever
//! banner a service sends unprompted.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portsweep::scanner::{EngineConfig, ScanOrchestrator};
//! use portsweep::types::Port;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = EngineConfig::new(100, Duration::from_secs(1));
//!     let orchestrator = ScanOrchestrator::new(config).unwrap();
//!
//!     let targets = vec!["127.0.0.1".to_string()];
//!     let ports: Vec<Port> = (1..=1024).filter_map(Port::new).collect();
//!     let report = orchestrator.run(&targets, &ports).await.unwrap();
//!
//!     for result in &report.results {
//!         println!("{}:{} open", result.target(), result.port());
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`scanner`] - The scan engine: task source, worker pool, aggregator,
//!   progress tracker and multi-target orchestrator
//! - [`banner`] - Passive banner reads on open connections
//! - [`types`] - Validated port and target inputs
//! - [`config`] - Settings file handling
//! - [`cli`] - Command-line front end
//! - [`output`] - Plain, JSON and CSV rendering
//! - [`error`] - Error types

pub mod banner;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ConfigError, ScanError};
pub use scanner::{EngineConfig, ScanOrchestrator, ScanReport, ScanResult, ScanSummary};
pub use types::{Port, PortSpec, TargetSpec};
