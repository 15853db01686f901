//! Trip Settlement Engine Library
//! # Overview
//!
//! This library splits shared trip expenses among participants and computes
//! the payments that settle every resulting debt. It reads participants and
//! expenses from CSV files and provides both a sync and an async strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Participant, Expense, TripReport, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::split_calculator`] - Per-expense shares for each split policy
//!   - [`core::balance_aggregator`] - Paid, share and net balance per participant
//!   - [`core::settlement_optimizer`] - Greedy debt netting into payments
//!   - [`core::engine`] - One trip's computation, end to end
//! - [`io`] - CSV input, CSV and JSON output
//! - [`strategy`] - Pluggable processing pipelines
//!
//! # Split Policies
//!
//! - **EQUAL**: Divide the amount evenly across all trip participants
//! - **CUSTOM**: Use explicit per-participant amounts
//! - **PERCENTAGE**: Use explicit per-participant percentages of the amount
//! - **EXCLUDE**: Divide evenly across everyone not named in the details
//!
//! # Balances
//!
//! Each participant's balance is `share - paid`:
//! - positive: owes money
//! - negative: is owed money
//!
//! Every amount is rounded half-up to the minor currency unit (cents by
//! default), and the first participant in ID order absorbs rounding residue
//! so shares always add up to the expense amount.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{EngineConfig, EventSink, SettlementEngine, TripBook, ValidationMode};
pub use io::{write_reports_json, write_settlement_csv};
pub use types::{
    Expense, ExpenseId, Participant, ParticipantBalance, ParticipantId, SettlementError,
    SettlementEvent, SettlementSummary, SplitPolicy, SplitType, Transaction, TripId, TripReport,
    TripSnapshot,
};
