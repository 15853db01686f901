//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over participant or expense records from a CSV
//! file. Delegates CSV format concerns to the csv_format module.
//!
//! # Design
//!
//! The SyncReader uses csv::Reader to read and deserialize CSV rows sequentially,
//! converting each row through its [`CsvRow`] implementation. It maintains
//! streaming behavior by processing rows one at a time without loading the
//! entire file into memory.
//!
//! ```no_run
//! use trip_settlement_engine::io::{ExpenseCsvRecord, SyncReader};
//! use std::path::Path;
//!
//! let reader = SyncReader::<ExpenseCsvRecord>::new(Path::new("expenses.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Expense {} for trip {}", record.expense.id, record.trip),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row errors are yielded as [`RowError`]s in the iterator,
//!   carrying the line number and the trip the row names

use crate::io::csv_format::{convert_row, CsvRow, RowError};
use crate::io::open_error;
use crate::types::SettlementError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::marker::PhantomData;
use std::path::Path;

/// Synchronous CSV reader
///
/// Yields one converted record per CSV row. The row type selects the file
/// layout (participants or expenses).
#[derive(Debug)]
pub struct SyncReader<R: CsvRow> {
    reader: csv::Reader<File>,
    line_num: u64,
    _row: PhantomData<fn() -> R>,
}

impl<R: CsvRow> SyncReader<R> {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (for the optional split columns)
    /// - Use an 8KB buffer for efficient I/O
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReader)` if file opened successfully
    /// * `Err(String)` if file could not be opened
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path).map_err(|e| open_error(path, e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
            _row: PhantomData,
        })
    }
}

impl<R: CsvRow> Iterator for SyncReader<R> {
    type Item = Result<R::Record, RowError>;

    /// Get the next record from the CSV file
    ///
    /// # Returns
    ///
    /// * `Some(Ok(record))` - Successfully parsed record
    /// * `Some(Err(RowError))` - Parse or conversion error with line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<R>();
        let row = deserializer.next()?;
        self.line_num += 1;

        // +1 for the header line
        let line = self.line_num + 1;
        Some(match row {
            Ok(csv_row) => convert_row(csv_row, line),
            Err(e) => Err(RowError {
                line,
                trip: None,
                error: SettlementError::from(e),
            }),
        })
    }
}
