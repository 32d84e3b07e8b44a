//! CSV output formatting.

use crate::scanner::ScanReport;
use crate::services::service_name;
use std::io::{self, Write};

/// Write one row per retained result.
pub fn write_csv<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["target", "port", "open", "service", "banner"])?;

    for result in &report.results {
        let port = result.port().to_string();
        wtr.write_record([
            result.target(),
            port.as_str(),
            if result.is_open() { "true" } else { "false" },
            service_name(result.port().as_u16()).unwrap_or(""),
            result.banner().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
