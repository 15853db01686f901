//! Settlement output types
//!
//! Transactions, summaries and reports are produced per request and never
//! persisted.

use super::error::SettlementError;
use super::participant::{ParticipantBalance, ParticipantId};
use super::trip::TripId;
use rust_decimal::Decimal;
use serde::Serialize;

/// A single point-to-point payment: `from` owes `to`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The debtor (positive balance)
    pub from: ParticipantId,

    /// Debtor's display name
    pub from_name: String,

    /// The creditor (negative balance)
    pub to: ParticipantId,

    /// Creditor's display name
    pub to_name: String,

    /// Amount to pay, rounded to the minor currency unit
    pub amount: Decimal,
}

/// Aggregate sanity totals for a trip
///
/// `total_paid` and `total_share` should both equal `total_expenses` within
/// tolerance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementSummary {
    /// Sum of all expense amounts
    pub total_expenses: Decimal,

    /// Sum of all `paid` values
    pub total_paid: Decimal,

    /// Sum of all `share` values
    pub total_share: Decimal,

    /// Currency passed through from the caller
    pub currency: String,
}

/// Complete result of settling one trip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripReport {
    /// Trip ID
    pub trip: TripId,

    /// Per-participant paid/share/balance, in input order
    pub participants: Vec<ParticipantBalance>,

    /// Settlement payments in emission order
    pub settlement: Vec<Transaction>,

    /// Aggregate totals
    pub summary: SettlementSummary,
}

/// Notification emitted by the caller once a trip has been computed
///
/// The engine never emits these itself; see [`crate::core::EventSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum SettlementEvent {
    /// The trip was settled successfully
    Settled(TripReport),

    /// The trip's computation was rejected
    Rejected {
        /// Trip ID
        trip: TripId,
        /// Why the computation failed
        error: SettlementError,
    },
}

impl SettlementEvent {
    /// Build the event describing the outcome of a computation
    pub fn from_outcome(trip: TripId, outcome: Result<TripReport, SettlementError>) -> Self {
        match outcome {
            Ok(report) => SettlementEvent::Settled(report),
            Err(error) => SettlementEvent::Rejected { trip, error },
        }
    }

    /// Trip this event refers to
    pub fn trip(&self) -> &str {
        match self {
            SettlementEvent::Settled(report) => &report.trip,
            SettlementEvent::Rejected { trip, .. } => trip,
        }
    }
}
