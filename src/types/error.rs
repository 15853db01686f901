//! Error types for the trip settlement engine
//!
//! This module defines all error types that can occur while loading trip data
//! and computing balances and settlements. Errors are designed to be descriptive
//! and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Parsing Errors**: Malformed CSV, invalid amounts, unknown split types
//! - **Split Errors**: Empty participant sets, unknown participants, mismatched details
//! - **Settlement Errors**: Balances that do not net to zero, arithmetic overflow

use super::expense::ExpenseId;
use super::participant::ParticipantId;
use super::trip::TripId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the settlement engine
///
/// Every variant is local to a single trip's computation; nothing here
/// corrupts state shared with other trips.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Reading continues with the next record. If the malformed record names
    /// a trip, that trip is rejected with this error.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Invalid expense amount (negative or malformed)
    #[error("Invalid amount '{amount}' for expense {expense}")]
    InvalidAmount {
        /// The invalid amount string
        amount: String,
        /// Expense ID
        expense: ExpenseId,
    },

    /// The split type does not name a known policy
    #[error("Unsupported split type '{split_type}'{}", expense.as_ref().map(|e| format!(" for expense {}", e)).unwrap_or_default())]
    UnsupportedSplitType {
        /// The split type string as supplied
        split_type: String,
        /// Expense ID (if available)
        expense: Option<ExpenseId>,
    },

    /// A single split detail entry is malformed or out of range
    #[error("Invalid split detail '{detail}' for expense {expense}: {reason}")]
    InvalidSplitDetail {
        /// The offending detail entry
        detail: String,
        /// Expense ID
        expense: ExpenseId,
        /// Why the entry was rejected
        reason: String,
    },

    /// There is nobody to split the expense across
    #[error("Expense {expense} cannot be split: no participants to share it")]
    EmptyParticipantSet {
        /// Expense ID
        expense: ExpenseId,
    },

    /// An expense references a participant that is not part of the trip
    #[error("Unknown participant '{participant}' referenced by expense {expense}")]
    UnknownParticipant {
        /// The unknown participant ID
        participant: ParticipantId,
        /// Expense ID
        expense: ExpenseId,
    },

    /// Participant IDs must be unique within a trip
    #[error("Duplicate participant '{participant}' in trip {trip}")]
    DuplicateParticipant {
        /// The duplicated participant ID
        participant: ParticipantId,
        /// Trip ID
        trip: TripId,
    },

    /// CUSTOM amounts or PERCENTAGE values do not add up
    #[error("Split details for expense {expense} sum to {actual}, expected {expected}")]
    SplitDetailMismatch {
        /// Expense ID
        expense: ExpenseId,
        /// Expected total (the expense amount, or 100 for percentages)
        expected: Decimal,
        /// Actual total of the supplied details
        actual: Decimal,
    },

    /// Aggregated balances do not net to zero
    ///
    /// Always fatal to the computation: a settlement plan built on top of
    /// these balances would be misleading.
    #[error("Balances sum to {sum}, expected zero within {tolerance}")]
    BalanceInvariantViolation {
        /// Sum of all balances
        sum: Decimal,
        /// Tolerance that was exceeded
        tolerance: Decimal,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
    },
}

// Conversion from io::Error to SettlementError
impl From<std::io::Error> for SettlementError {
    fn from(error: std::io::Error) -> Self {
        SettlementError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to SettlementError
impl From<csv::Error> for SettlementError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        SettlementError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl SettlementError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str, expense: &str) -> Self {
        SettlementError::InvalidAmount {
            amount: amount.to_string(),
            expense: expense.to_string(),
        }
    }

    /// Create an UnsupportedSplitType error
    pub fn unsupported_split_type(split_type: &str, expense: Option<&str>) -> Self {
        SettlementError::UnsupportedSplitType {
            split_type: split_type.to_string(),
            expense: expense.map(str::to_string),
        }
    }

    /// Create an InvalidSplitDetail error
    pub fn invalid_split_detail(detail: &str, expense: &str, reason: &str) -> Self {
        SettlementError::InvalidSplitDetail {
            detail: detail.to_string(),
            expense: expense.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an EmptyParticipantSet error
    pub fn empty_participant_set(expense: &str) -> Self {
        SettlementError::EmptyParticipantSet {
            expense: expense.to_string(),
        }
    }

    /// Create an UnknownParticipant error
    pub fn unknown_participant(participant: &str, expense: &str) -> Self {
        SettlementError::UnknownParticipant {
            participant: participant.to_string(),
            expense: expense.to_string(),
        }
    }

    /// Create a DuplicateParticipant error
    pub fn duplicate_participant(participant: &str, trip: &str) -> Self {
        SettlementError::DuplicateParticipant {
            participant: participant.to_string(),
            trip: trip.to_string(),
        }
    }

    /// Create a SplitDetailMismatch error
    pub fn split_detail_mismatch(expense: &str, expected: Decimal, actual: Decimal) -> Self {
        SettlementError::SplitDetailMismatch {
            expense: expense.to_string(),
            expected,
            actual,
        }
    }

    /// Create a BalanceInvariantViolation error
    pub fn balance_invariant_violation(sum: Decimal, tolerance: Decimal) -> Self {
        SettlementError::BalanceInvariantViolation { sum, tolerance }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str) -> Self {
        SettlementError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }
}
