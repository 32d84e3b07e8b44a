//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::scanner::ScanReport;
use crate::services::service_name;
use console::style;
use std::io::{self, Write};

/// Print results in human-readable plain text format.
pub fn write_plain<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    let summary = &report.summary;

    for tally in &summary.per_target {
        writeln!(
            out,
            "{}: {} open ports found",
            style(&tally.target).bold(),
            style(tally.open_port_count).green().bold()
        )?;
    }

    writeln!(out)?;
    if report.results.is_empty() {
        writeln!(out, "{}", style("No open ports found.").dim())?;
    } else {
        let heading = if report.results.iter().all(|r| r.is_open()) {
            "Open ports:"
        } else {
            "Ports:"
        };
        writeln!(out, "{}", style(heading).bold())?;
        for result in &report.results {
            let state = if result.is_open() {
                style("Open").green().bold()
            } else {
                style("Closed").red()
            };

            write!(out, "{}:{} - {}", result.target(), result.port(), state)?;
            if let Some(service) = service_name(result.port().as_u16()) {
                write!(out, " [{}]", style(service).cyan())?;
            }
            if let Some(banner) = result.banner() {
                write!(out, " (Banner: {})", style(truncate_string(banner, 80)).dim())?;
            }
            writeln!(out)?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "Scan completed in {:.2}s ({} targets, {} ports attempted, {} workers, {}s timeout)",
        summary.elapsed().as_secs_f64(),
        summary.targets.len(),
        summary.total_port_count,
        summary.worker_count,
        summary.timeout_seconds
    )?;
    writeln!(
        out,
        "Total open ports found: {}",
        style(summary.open_port_count).green().bold()
    )?;

    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(targets: &[String], ports: usize, workers: usize) {
    eprintln!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portsweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!(
        "{} Targets: {}",
        style("•").dim(),
        style(targets.join(", ")).white().bold()
    );
    eprintln!(
        "{} Scanning {} ports per target with {} workers",
        style("•").dim(),
        style(ports).white().bold(),
        workers
    );
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Truncate a string to at most `max_chars` characters, adding an ellipsis.
fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
