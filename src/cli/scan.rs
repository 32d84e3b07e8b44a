//! Scan command implementation.
//!
//! Resolves flags, environment and settings into engine inputs, runs the
//! scan, and renders the report.

use crate::cli::OutputFormat;
use crate::config::AppSettings;
use crate::error::{CliError, CliResult};
use crate::output::{self, BarReporter};
use crate::scanner::{run_scan, EngineConfig, ProgressReporter, SilentReporter};
use crate::types::{parse_target_list, Port, PortRange, PortSpec};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Scan targets for open TCP ports.
#[derive(Args, Debug, Clone)]
pub struct ScanCommand {
    /// Target hostname or IP
    #[arg(long, default_value = "scanme.nmap.org")]
    pub target: String,

    /// Comma-separated list of targets (IPs, hostnames or CIDR ranges); overrides --target
    #[arg(long, value_name = "LIST")]
    pub targets: Option<String>,

    /// Starting port
    #[arg(long, default_value_t = 1)]
    pub start: u16,

    /// Ending port
    #[arg(long, default_value_t = 1024)]
    pub end: u16,

    /// Port specification (e.g. "22,80,8000-8100"); overrides --start/--end
    #[arg(short, long, env = "PORTSWEEP_PORTS")]
    pub ports: Option<String>,

    /// Number of concurrent workers per target
    #[arg(short, long, env = "PORTSWEEP_WORKERS")]
    pub workers: Option<usize>,

    /// Connection and banner timeout in seconds
    #[arg(short, long, env = "PORTSWEEP_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Output results in JSON format (same as --output json)
    #[arg(long, conflicts_with = "output")]
    pub json: bool,

    /// Include closed ports in the results
    #[arg(long)]
    pub show_closed: bool,
}

impl ScanCommand {
    /// The ordered target list.
    pub fn target_list(&self) -> CliResult<Vec<String>> {
        let input = self.targets.as_deref().unwrap_or(&self.target);
        Ok(parse_target_list(input)?)
    }

    /// The ordered port list.
    pub fn port_list(&self) -> CliResult<Vec<Port>> {
        let spec = match &self.ports {
            Some(spec) => spec.parse::<PortSpec>()?,
            None => PortSpec::from(PortRange::from_bounds(self.start, self.end)?),
        };
        Ok(spec.to_ports())
    }

    /// Engine settings, with flags and environment taking precedence over
    /// the settings file.
    pub fn engine_config(&self, settings: &AppSettings) -> CliResult<EngineConfig> {
        let workers = self.workers.unwrap_or(settings.default_workers);
        if workers == 0 {
            return Err(CliError::Other("worker count must be at least 1".to_string()));
        }

        let timeout = self.timeout.unwrap_or(settings.default_timeout_secs);
        if timeout == 0 {
            return Err(CliError::Other("timeout must be at least 1 second".to_string()));
        }

        let config = EngineConfig::new(workers, Duration::from_secs(timeout));
        Ok(if self.show_closed {
            config.with_closed()
        } else {
            config
        })
    }

    pub fn output_format(&self, settings: &AppSettings) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output.unwrap_or(settings.default_output_format)
        }
    }

    /// Execute the scan command.
    pub async fn execute(&self, settings: &AppSettings, quiet: bool) -> CliResult<()> {
        let targets = self.target_list()?;
        let ports = self.port_list()?;
        let config = self.engine_config(settings)?;
        let format = self.output_format(settings);
        debug!(?targets, ports = ports.len(), ?config, %format, "resolved scan inputs");

        // Keep stdout parseable for JSON and CSV.
        let interactive = !quiet && format == OutputFormat::Plain;
        if interactive {
            output::print_scan_header(&targets, ports.len(), config.workers);
        }

        let reporter: Arc<dyn ProgressReporter> = if interactive && settings.show_progress {
            Arc::new(BarReporter::new())
        } else {
            Arc::new(SilentReporter)
        };

        let report = run_scan(&targets, &ports, config, reporter).await?;
        output::print_report(&report, format)?;

        Ok(())
    }
}
