//! JSON output for full trip reports
//!
//! Serializes every trip's participants (paid/share/balance), settlement
//! payments and summary. Amounts are emitted as decimal strings so no precision
//! is lost to binary floats.

use crate::types::TripReport;
use std::io::Write;

/// Write trip reports as a pretty-printed JSON array, sorted by trip ID
pub fn write_reports_json(reports: &[TripReport], output: &mut dyn Write) -> Result<(), String> {
    let mut sorted_reports: Vec<&TripReport> = reports.iter().collect();
    sorted_reports.sort_by(|a, b| a.trip.cmp(&b.trip));

    serde_json::to_writer_pretty(&mut *output, &sorted_reports)
        .map_err(|e| format!("Failed to write JSON report: {}", e))?;
    writeln!(output).map_err(|e| format!("Failed to write JSON report: {}", e))?;
    output
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
