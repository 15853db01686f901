//! Expense-related types for the trip settlement engine
//!
//! This module defines expenses and the closed set of split policies used to
//! distribute an expense's cost across a trip's participants.

use super::error::SettlementError;
use super::participant::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Expense identifier
pub type ExpenseId = String;

/// Split types supported by the settlement engine
///
/// The set is closed. An expense row with any other type fails to convert,
/// and the trip it belongs to is rejected with `UnsupportedSplitType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SplitType {
    /// Split evenly across every participant of the trip
    Equal,

    /// Absolute amount owed per participant
    Custom,

    /// Percentage (0-100) of the amount owed per participant
    Percentage,

    /// Split evenly across everyone except the listed participants
    Exclude,
}

impl FromStr for SplitType {
    type Err = SettlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EQUAL" => Ok(SplitType::Equal),
            "CUSTOM" => Ok(SplitType::Custom),
            "PERCENTAGE" => Ok(SplitType::Percentage),
            "EXCLUDE" => Ok(SplitType::Exclude),
            _ => Err(SettlementError::unsupported_split_type(s, None)),
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SplitType::Equal => "EQUAL",
            SplitType::Custom => "CUSTOM",
            SplitType::Percentage => "PERCENTAGE",
            SplitType::Exclude => "EXCLUDE",
        };
        f.write_str(name)
    }
}

/// A split policy together with its payload
#[derive(Debug, Clone, PartialEq)]
pub enum SplitPolicy {
    /// Every participant owes `amount / n`
    Equal,

    /// Participant ID → absolute amount owed
    Custom(BTreeMap<ParticipantId, Decimal>),

    /// Participant ID → percentage of the amount owed
    Percentage(BTreeMap<ParticipantId, Decimal>),

    /// Participant IDs excluded from an otherwise even split
    Exclude(BTreeSet<ParticipantId>),
}

impl SplitPolicy {
    /// The split type this policy implements
    pub fn split_type(&self) -> SplitType {
        match self {
            SplitPolicy::Equal => SplitType::Equal,
            SplitPolicy::Custom(_) => SplitType::Custom,
            SplitPolicy::Percentage(_) => SplitType::Percentage,
            SplitPolicy::Exclude(_) => SplitType::Exclude,
        }
    }
}

/// A recorded expense
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// Expense ID
    pub id: ExpenseId,

    /// The participant who paid
    pub paid_by: ParticipantId,

    /// Amount paid, never negative
    pub amount: Decimal,

    /// How the amount is shared
    pub policy: SplitPolicy,
}

impl Expense {
    /// Create a new expense
    pub fn new(
        id: impl Into<ExpenseId>,
        paid_by: impl Into<ParticipantId>,
        amount: Decimal,
        policy: SplitPolicy,
    ) -> Self {
        Expense {
            id: id.into(),
            paid_by: paid_by.into(),
            amount,
            policy,
        }
    }
}
