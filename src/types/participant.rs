//! Participant-related types for the trip settlement engine
//!
//! A participant's identity is supplied by the caller; the engine only derives
//! the numeric fields (`paid`, `share`, `balance`) for one computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Participant identifier
///
/// Opaque, unique within a trip.
pub type ParticipantId = String;

/// A member of a trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// The participant ID
    pub id: ParticipantId,

    /// Display name, carried through to the settlement output
    pub name: String,
}

impl Participant {
    /// Create a new participant
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Participant {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Derived per-participant totals
///
/// Positive `balance` means the participant owes money; negative means the
/// participant is owed money.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantBalance {
    /// The participant ID
    pub id: ParticipantId,

    /// Display name
    pub name: String,

    /// Sum of the amounts this participant paid
    pub paid: Decimal,

    /// Sum of the amounts this participant owes
    pub share: Decimal,

    /// `share - paid`
    pub balance: Decimal,
}

impl ParticipantBalance {
    /// Create a zeroed balance entry for a participant
    pub fn new(participant: &Participant) -> Self {
        ParticipantBalance {
            id: participant.id.clone(),
            name: participant.name.clone(),
            paid: Decimal::ZERO,
            share: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }
}
