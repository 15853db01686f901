//! Trip-level input types
//!
//! A trip snapshot is the immutable input of one settlement computation.
//! Records pair a participant or expense with the trip it belongs to, as read
//! from the input files.

use super::error::SettlementError;
use super::expense::Expense;
use super::participant::Participant;

/// Trip identifier
pub type TripId = String;

/// A participant row tagged with its trip
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRecord {
    /// The trip this participant belongs to
    pub trip: TripId,

    /// The participant
    pub participant: Participant,
}

/// An expense row tagged with its trip
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    /// The trip this expense was recorded against
    pub trip: TripId,

    /// The expense
    pub expense: Expense,
}

/// Participants and expenses of one trip
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TripSnapshot {
    /// Trip ID
    pub trip: TripId,

    /// Participants in input order
    pub participants: Vec<Participant>,

    /// Expenses in input order
    pub expenses: Vec<Expense>,

    /// Errors from rows of this trip that could not be read, in input order
    ///
    /// A trip with any of these cannot be settled.
    pub rejected_rows: Vec<SettlementError>,
}

impl TripSnapshot {
    /// Create an empty snapshot for a trip
    pub fn new(trip: impl Into<TripId>) -> Self {
        TripSnapshot {
            trip: trip.into(),
            participants: Vec::new(),
            expenses: Vec::new(),
            rejected_rows: Vec::new(),
        }
    }
}
