//! I/O module
//!
//! Handles CSV parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, settlement output)
//! - `json_format` - JSON output of full trip reports
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod json_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_expense_record, convert_participant_record, convert_row, parse_split_policy,
    write_settlement_csv, CsvRow, ExpenseCsvRecord, ParticipantCsvRecord, RowError,
};
pub use json_format::write_reports_json;
pub use sync_reader::SyncReader;

use crate::cli::OutputFormat;
use crate::types::{SettlementError, TripReport};
use std::io::{self, Write};
use std::path::Path;

/// Describe a failure to open an input file
pub(crate) fn open_error(path: &Path, error: io::Error) -> String {
    let error = match error.kind() {
        io::ErrorKind::NotFound => SettlementError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => SettlementError::from(error),
    };
    format!("Failed to open file '{}': {}", path.display(), error)
}

/// Write trip reports in the requested output format
pub fn write_reports(
    reports: &[TripReport],
    format: OutputFormat,
    scale: u32,
    output: &mut dyn Write,
) -> Result<(), String> {
    match format {
        OutputFormat::Csv => write_settlement_csv(reports, scale, output),
        OutputFormat::Json => write_reports_json(reports, output),
    }
}
