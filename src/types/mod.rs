//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `participant`: Participants and their derived balances
//! - `expense`: Expenses and split policies
//! - `trip`: Trip snapshots and input records
//! - `settlement`: Settlement transactions, summaries and reports
//! - `error`: Error types for the settlement engine

pub mod error;
pub mod expense;
pub mod participant;
pub mod settlement;
pub mod trip;

pub use error::SettlementError;
pub use expense::{Expense, ExpenseId, SplitPolicy, SplitType};
pub use participant::{Participant, ParticipantBalance, ParticipantId};
pub use settlement::{SettlementEvent, SettlementSummary, TripReport, Transaction};
pub use trip::{ExpenseRecord, ParticipantRecord, TripId, TripSnapshot};
