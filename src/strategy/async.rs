//! Asynchronous concurrent processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. Input is read in batches, then every trip is
//! settled on its own task.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_trips)
//!     ├── AsyncReader (batch CSV reading, participants then expenses)
//!     ├── TripBook (grouping into snapshots)
//!     └── one task per trip
//!         ├── Semaphore permit (bounds concurrent computations)
//!         ├── SettlementEngine::compute
//!         └── EventSink (unbounded channel back to the writer)
//! ```
//!
//! # Concurrency
//!
//! Trips share no state, so each computation runs independently. Reading is
//! finished before any trip starts, which keeps a trip's expenses in input
//! order. Reports are sorted by trip ID before output, so the result matches
//! the synchronous strategy byte for byte.

use crate::core::{EventSink, SettlementEngine, TripBook};
use crate::io::{
    open_error, write_reports, AsyncReader, CsvRow, ExpenseCsvRecord, ParticipantCsvRecord,
};
use crate::io::RowError;
use crate::strategy::{
    record_row, reports_from_events, ProcessingStrategy, SettlementOptions, TripInput,
};
use crate::types::SettlementEvent;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::{debug, warn};

/// Configuration for async processing
///
/// Controls how many rows are read per batch and how many trips are computed
/// at the same time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of CSV rows per read batch
    pub batch_size: usize,
    /// Maximum number of trips computing concurrently
    pub max_concurrent_trips: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_trips: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_trips: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_trips = if max_concurrent_trips == 0 {
            warn!(
                "Invalid max_concurrent_trips ({}), using default ({})",
                max_concurrent_trips, default.max_concurrent_trips
            );
            default.max_concurrent_trips
        } else {
            max_concurrent_trips
        };

        Self {
            batch_size,
            max_concurrent_trips,
        }
    }
}

/// Asynchronous concurrent processing strategy
///
/// # Configuration
///
/// The strategy accepts a BatchConfig with:
/// - `batch_size`: Number of CSV rows per read batch (default: 1000)
/// - `max_concurrent_trips`: Worker threads and concurrent trips (default: CPU cores)
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    options: SettlementOptions,
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(options: SettlementOptions, config: BatchConfig) -> Self {
        Self { options, config }
    }

    async fn read_all<Row>(
        &self,
        path: &Path,
    ) -> Result<Vec<Result<Row::Record, RowError>>, String>
    where
        Row: CsvRow + Send + 'static,
    {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| open_error(path, e))?;

        let mut reader: AsyncReader<_, Row> = AsyncReader::new(file.compat());
        let mut rows = Vec::new();

        loop {
            let batch = reader.read_batch(self.config.batch_size).await;
            if batch.is_empty() {
                break;
            }
            rows.extend(batch);
        }

        Ok(rows)
    }

    async fn read_trips(&self, input: &TripInput) -> Result<TripBook, String> {
        let mut book = TripBook::new();

        for row in self
            .read_all::<ParticipantCsvRecord>(&input.participants)
            .await?
        {
            record_row(&mut book, row, TripBook::add_participant);
        }
        for row in self.read_all::<ExpenseCsvRecord>(&input.expenses).await? {
            record_row(&mut book, row, TripBook::add_expense);
        }

        Ok(book)
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Settle every trip and write the results
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Reads both files in batches into a TripBook
    /// 3. Spawns one task per trip, gated by a semaphore
    /// 4. Each task computes its trip and emits the outcome to the channel sink
    /// 5. Collects every event and writes the settled reports
    ///
    /// # Error Handling
    ///
    /// Fatal errors (file not found, runtime errors, panicked tasks) are
    /// returned immediately. A malformed row rejects its trip, and failed
    /// trips are logged.
    fn process(&self, input: &TripInput, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_trips)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        let events = runtime.block_on(async {
            let book = self.read_trips(input).await?;
            debug!("Read {} trips", book.len());

            let engine = SettlementEngine::new(self.options.engine);
            let currency: Arc<str> = Arc::from(self.options.currency.as_str());
            let permits = Arc::new(Semaphore::new(self.config.max_concurrent_trips));
            let (sink, mut events) = mpsc::unbounded_channel();

            let mut handles = Vec::with_capacity(book.len());
            for snapshot in book.into_snapshots() {
                let permits = Arc::clone(&permits);
                let currency = Arc::clone(&currency);
                let sink = sink.clone();

                handles.push(tokio::spawn(async move {
                    let Ok(_permit) = permits.acquire_owned().await else {
                        warn!("Trip {} skipped: semaphore closed", snapshot.trip);
                        return;
                    };
                    let outcome = engine.compute(&snapshot, &currency);
                    sink.emit(SettlementEvent::from_outcome(snapshot.trip, outcome));
                }));
            }
            drop(sink);

            for handle in handles {
                handle
                    .await
                    .map_err(|e| format!("Trip task failed: {}", e))?;
            }

            let mut received = Vec::new();
            while let Some(event) = events.recv().await {
                received.push(event);
            }

            Ok::<_, String>(received)
        })?;

        let reports = reports_from_events(events);
        write_reports(
            &reports,
            self.options.format,
            self.options.engine.scale,
            output,
        )
    }
}
