//! Processing strategy module for trip settlement
//!
//! This module defines the Strategy pattern for complete settlement pipelines,
//! encompassing CSV parsing, per-trip computation, event emission and report
//! output. This allows different processing implementations (synchronous,
//! asynchronous concurrent) to be selected at runtime.
//!
//! Both strategies produce byte-identical output for the same input.

use crate::cli::{OutputFormat, StrategyType};
use crate::core::{EngineConfig, TripBook};
use crate::io::RowError;
use crate::types::{SettlementEvent, TripReport};
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info, warn};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Default trip currency
pub const DEFAULT_CURRENCY: &str = "INR";

/// Paths to the two input files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripInput {
    /// CSV with columns `trip,id,name`
    pub participants: PathBuf,

    /// CSV with columns `trip,id,paid_by,amount,split_type,split_details`
    pub expenses: PathBuf,
}

/// Settings shared by every processing strategy
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementOptions {
    pub engine: EngineConfig,
    pub currency: String,
    pub format: OutputFormat,
}

impl Default for SettlementOptions {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            currency: DEFAULT_CURRENCY.to_string(),
            format: OutputFormat::Csv,
        }
    }
}

/// Processing strategy trait for complete settlement pipelines
///
/// Each strategy must be able to read participants and expenses from CSV
/// files, settle every trip through the engine, and write the reports to
/// output.
pub trait ProcessingStrategy: Send + Sync {
    /// Settle every trip found in the input files and write the results
    ///
    /// # Returns
    ///
    /// * `Ok(())` if processing completed (individual trips may still have failed)
    /// * `Err(String)` if a fatal error occurred (file not found, I/O error, etc.)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An input file cannot be opened
    /// - Output cannot be written
    ///
    /// A malformed row rejects the trip it names, and a row naming no trip is
    /// logged and skipped. A rejected trip is logged and left out of the
    /// output; the other trips are unaffected.
    fn process(&self, input: &TripInput, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `options` - Engine, currency and output settings
/// * `config` - Optional configuration for async processing (ignored for sync)
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    options: SettlementOptions,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(options)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(options, config))
        }
    }
}

/// Add one read result to the book
///
/// A row that failed to read is charged to the trip it names, which is then
/// rejected rather than settled without it.
pub(crate) fn record_row<T>(
    book: &mut TripBook,
    row: Result<T, RowError>,
    add: impl FnOnce(&mut TripBook, T),
) {
    match row {
        Ok(record) => add(book, record),
        Err(RowError {
            line,
            trip: Some(trip),
            error,
        }) => {
            warn!("Line {}: {}; trip {} will be rejected", line, error, trip);
            book.reject_row(trip, error);
        }
        Err(e) => warn!("Skipping row without a trip: {}", e),
    }
}

/// Turn received events into the reports to write
///
/// Rejected trips are logged and dropped. Reports come back sorted by trip ID
/// regardless of the order events arrived in.
pub(crate) fn reports_from_events(
    events: impl IntoIterator<Item = SettlementEvent>,
) -> Vec<TripReport> {
    let mut reports: Vec<TripReport> = events
        .into_iter()
        .filter_map(|event| match event {
            SettlementEvent::Settled(report) => {
                info!(
                    "Trip {} settled with {} payments",
                    report.trip,
                    report.settlement.len()
                );
                Some(report)
            }
            SettlementEvent::Rejected { trip, error } => {
                error!("Trip {} rejected: {}", trip, error);
                None
            }
        })
        .collect();

    reports.sort_by(|a, b| a.trip.cmp(&b.trip));
    reports
}
