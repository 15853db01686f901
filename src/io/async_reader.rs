//! Asynchronous CSV reader with stream interface
//!
//! Provides a streaming interface over participant or expense records from a
//! CSV source. Supports batch reading for efficient async processing.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - futures `AsyncRead` so tokio files plug in through the compat layer
//! - Batch reading to bound memory per await point
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader<_, Row> → Batches of Result<Row::Record, RowError>
//!                  ↓
//!           csv_format module
//!           (convert_row)
//! ```

use crate::io::csv_format::{convert_row, CsvRow, RowError};
use crate::types::SettlementError;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use std::marker::PhantomData;

/// Asynchronous CSV reader
///
/// Provides batch reading interface over converted records.
/// Rows that fail to parse or convert come back as [`RowError`]s in the batch.
pub struct AsyncReader<R: AsyncRead + Unpin, Row: CsvRow> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
    _row: PhantomData<fn() -> Row>,
}

impl<R, Row> AsyncReader<R, Row>
where
    R: AsyncRead + Unpin + Send + 'static,
    Row: CsvRow + Send + 'static,
{
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 0,
            _row: PhantomData,
        }
    }

    /// Read a batch of records
    ///
    /// Reads up to `batch_size` rows, converting each through [`convert_row`].
    ///
    /// # Returns
    ///
    /// One result per row, in input order. An empty vector means the end of
    /// the input was reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<Result<Row::Record, RowError>> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut rows = self.csv_reader.deserialize::<Row>();

        while batch.len() < batch_size {
            let Some(row) = rows.next().await else {
                break;
            };
            self.line_num += 1;

            // +1 for the header line
            let line = self.line_num + 1;
            batch.push(match row {
                Ok(row) => convert_row(row, line),
                Err(e) => Err(RowError {
                    line,
                    trip: None,
                    error: SettlementError::ParseError {
                        line: Some(line),
                        message: e.to_string(),
                    },
                }),
            });
        }

        batch
    }
}
