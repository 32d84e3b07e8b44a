//! Output formatting module.
//!
//! Renders a finished [`ScanReport`] as plain text, JSON, or CSV, and provides
//! the terminal progress bar used while a scan runs.

mod csv_format;
mod json_format;
mod plain;
mod progress;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{print_error, print_scan_header, write_plain};
pub use progress::BarReporter;

use crate::cli::OutputFormat;
use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Render `report` to `out` in the requested format.
pub fn write_report<W: Write>(out: &mut W, report: &ScanReport, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => write_plain(out, report),
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Csv => write_csv(out, report),
    }
}

/// Render `report` to stdout.
pub fn print_report(report: &ScanReport, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report, format)?;
    out.flush()
}
