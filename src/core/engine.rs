//! Settlement engine
//!
//! This module provides the `SettlementEngine` that orchestrates one trip's
//! computation by running the split calculator, the balance aggregator and the
//! settlement optimizer in sequence.
//!
//! The engine is a pure function of its input snapshot: it performs no I/O,
//! keeps no state between calls and emits no events. Independent trips can be
//! computed concurrently without synchronization.

use crate::core::balance_aggregator::BalanceAggregator;
use crate::core::config::EngineConfig;
use crate::core::settlement_optimizer::SettlementOptimizer;
use crate::core::split_calculator::{sum, SplitCalculator};
use crate::types::{
    ParticipantBalance, SettlementError, SettlementSummary, TripReport, TripSnapshot,
};
use std::collections::HashSet;
use tracing::debug;

/// Trip settlement engine
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementEngine {
    config: EngineConfig,
    aggregator: BalanceAggregator,
    optimizer: SettlementOptimizer,
}

impl SettlementEngine {
    /// Create a new SettlementEngine
    pub fn new(config: EngineConfig) -> Self {
        SettlementEngine {
            config,
            aggregator: BalanceAggregator::new(SplitCalculator::new(config)),
            optimizer: SettlementOptimizer::new(config),
        }
    }

    /// The configuration this engine was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute balances, settlement and summary for one trip
    ///
    /// # Arguments
    ///
    /// * `snapshot` - Participants and expenses of the trip
    /// * `currency` - Trip currency, passed through to the summary
    ///
    /// # Returns
    ///
    /// * `Ok(TripReport)` with every amount rounded to the minor unit
    /// * `Err(SettlementError)` if the trip cannot be settled
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A row of the trip could not be read (the first such row's error)
    /// - A participant ID appears twice (`DuplicateParticipant`)
    /// - Any expense cannot be aggregated (see [`BalanceAggregator::aggregate`])
    /// - The balances do not net to zero (`BalanceInvariantViolation`)
    pub fn compute(
        &self,
        snapshot: &TripSnapshot,
        currency: &str,
    ) -> Result<TripReport, SettlementError> {
        if let Some(error) = snapshot.rejected_rows.first() {
            return Err(error.clone());
        }

        let mut seen = HashSet::with_capacity(snapshot.participants.len());
        for participant in &snapshot.participants {
            if !seen.insert(participant.id.as_str()) {
                return Err(SettlementError::duplicate_participant(
                    &participant.id,
                    &snapshot.trip,
                ));
            }
        }

        let balances = self
            .aggregator
            .aggregate(&snapshot.participants, &snapshot.expenses)?;
        let settlement = self.optimizer.settle(&balances)?;

        let summary = SettlementSummary {
            total_expenses: self.config.round(sum(
                snapshot.expenses.iter().map(|e| &e.amount),
                "expense total",
            )?),
            total_paid: self
                .config
                .round(sum(balances.iter().map(|b| &b.paid), "paid total")?),
            total_share: self
                .config
                .round(sum(balances.iter().map(|b| &b.share), "share total")?),
            currency: currency.to_string(),
        };

        debug!(
            "Trip {}: {} participants, {} expenses, {} payments",
            snapshot.trip,
            balances.len(),
            snapshot.expenses.len(),
            settlement.len()
        );

        Ok(TripReport {
            trip: snapshot.trip.clone(),
            participants: balances
                .into_iter()
                .map(|entry| self.rounded(entry))
                .collect(),
            settlement,
            summary,
        })
    }

    fn rounded(&self, entry: ParticipantBalance) -> ParticipantBalance {
        ParticipantBalance {
            paid: self.config.round(entry.paid),
            share: self.config.round(entry.share),
            balance: self.config.round(entry.balance),
            ..entry
        }
    }
}
