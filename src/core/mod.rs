//! Core business logic module
//!
//! This module contains the settlement computation components:
//! - `config` - Minor unit scale and validation mode
//! - `split_calculator` - Per-expense share computation for each split policy
//! - `balance_aggregator` - Folding expenses into per-participant balances
//! - `settlement_optimizer` - Greedy debt netting into point-to-point payments
//! - `engine` - Orchestration of one trip's computation
//! - `trip_book` - Grouping input records into per-trip snapshots
//! - `traits` - Event emission seam for callers

pub mod balance_aggregator;
pub mod config;
pub mod engine;
pub mod settlement_optimizer;
pub mod split_calculator;
pub mod traits;
pub mod trip_book;

pub use balance_aggregator::BalanceAggregator;
pub use config::{EngineConfig, ValidationMode};
pub use engine::SettlementEngine;
pub use settlement_optimizer::SettlementOptimizer;
pub use split_calculator::{Shares, SplitCalculator};
pub use traits::EventSink;
pub use trip_book::TripBook;
