//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates settlement by coordinating
//! between the SyncReader (for CSV input), the TripBook (for grouping) and the
//! SettlementEngine (for the computation).
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Per-trip grouping to `TripBook`
//! - Settlement to `SettlementEngine`
//! - Output to `io::write_reports`
//!
//! Outcomes travel through the same `EventSink` channel the async strategy
//! uses, so logging and output assembly are shared.

use crate::core::{EventSink, SettlementEngine, TripBook};
use crate::io::{write_reports, ExpenseCsvRecord, ParticipantCsvRecord, SyncReader};
use crate::strategy::{
    record_row, reports_from_events, ProcessingStrategy, SettlementOptions, TripInput,
};
use crate::types::SettlementEvent;
use std::io::Write;
use tokio::sync::mpsc;
use tracing::debug;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use trip_settlement_engine::strategy::{
///     ProcessingStrategy, SettlementOptions, SyncProcessingStrategy, TripInput,
/// };
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(SettlementOptions::default());
/// let input = TripInput {
///     participants: "participants.csv".into(),
///     expenses: "expenses.csv".into(),
/// };
///
/// strategy.process(&input, &mut io::stdout())
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SyncProcessingStrategy {
    options: SettlementOptions,
}

impl SyncProcessingStrategy {
    pub fn new(options: SettlementOptions) -> Self {
        Self { options }
    }

    fn read_trips(&self, input: &TripInput) -> Result<TripBook, String> {
        let mut book = TripBook::new();

        for row in SyncReader::<ParticipantCsvRecord>::new(&input.participants)? {
            record_row(&mut book, row, TripBook::add_participant);
        }

        for row in SyncReader::<ExpenseCsvRecord>::new(&input.expenses)? {
            record_row(&mut book, row, TripBook::add_expense);
        }

        Ok(book)
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Settle every trip and write the results
    ///
    /// 1. Reads both files into a TripBook
    /// 2. Computes each trip in trip ID order
    /// 3. Emits one event per trip to a channel sink
    /// 4. Drains the channel and writes the settled reports
    fn process(&self, input: &TripInput, output: &mut dyn Write) -> Result<(), String> {
        let book = self.read_trips(input)?;
        debug!("Read {} trips", book.len());

        let engine = SettlementEngine::new(self.options.engine);
        let (sink, mut events) = mpsc::unbounded_channel();

        for snapshot in book.into_snapshots() {
            let outcome = engine.compute(&snapshot, &self.options.currency);
            sink.emit(SettlementEvent::from_outcome(snapshot.trip, outcome));
        }
        drop(sink);

        let mut received = Vec::new();
        while let Ok(event) = events.try_recv() {
            received.push(event);
        }

        let reports = reports_from_events(received);
        write_reports(
            &reports,
            self.options.format,
            self.options.engine.scale,
            output,
        )
    }
}
