//! Settlement optimization module
//!
//! This module provides the `SettlementOptimizer`, which turns net balances into
//! an ordered list of point-to-point payments that bring every balance to zero.
//!
//! # Algorithm
//!
//! Greedy two-pointer debt netting: balances are sorted ascending (ties broken
//! by participant ID), the largest creditor sits at the low end and the largest
//! debtor at the high end. Each step pays the smaller of the two outstanding
//! amounts from the debtor to the creditor, then moves past whichever side has
//! been cleared.
//!
//! This is a heuristic, not a minimum-transaction solution (finding the true
//! minimum is NP-hard). It does guarantee at most `n - 1` payments for `n`
//! participants, and identical input always yields identical output.

use crate::core::config::EngineConfig;
use crate::core::split_calculator::sum;
use crate::types::{ParticipantBalance, SettlementError, Transaction};
use rust_decimal::Decimal;
use tracing::debug;

/// Working copy of one participant's outstanding balance
struct Position<'a> {
    participant: &'a ParticipantBalance,
    outstanding: Decimal,
}

/// Produces settlement payments from net balances
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementOptimizer {
    config: EngineConfig,
}

impl SettlementOptimizer {
    /// Create a new SettlementOptimizer
    pub fn new(config: EngineConfig) -> Self {
        SettlementOptimizer { config }
    }

    /// Compute the payments that settle every balance
    ///
    /// # Arguments
    ///
    /// * `balances` - Net balance per participant (positive owes, negative is owed)
    ///
    /// # Returns
    ///
    /// Transactions in emission order. Empty when every balance is already
    /// within one minor unit of zero or there is only one participant.
    ///
    /// # Errors
    ///
    /// Returns `BalanceInvariantViolation` if the balances do not sum to zero
    /// within one minor unit.
    pub fn settle(
        &self,
        balances: &[ParticipantBalance],
    ) -> Result<Vec<Transaction>, SettlementError> {
        let tolerance = self.config.tolerance();

        let total = sum(balances.iter().map(|b| &b.balance), "balance total")?;
        if total.abs() > tolerance {
            return Err(SettlementError::balance_invariant_violation(
                total, tolerance,
            ));
        }

        let mut positions: Vec<Position<'_>> = balances
            .iter()
            .map(|participant| Position {
                participant,
                outstanding: participant.balance,
            })
            .collect();
        positions.sort_by(|a, b| {
            a.outstanding
                .cmp(&b.outstanding)
                .then_with(|| a.participant.id.cmp(&b.participant.id))
        });

        let mut transactions = Vec::new();
        if positions.len() < 2 {
            return Ok(transactions);
        }

        let mut creditor = 0;
        let mut debtor = positions.len() - 1;

        while creditor < debtor {
            if positions[creditor].outstanding.abs() < tolerance {
                creditor += 1;
                continue;
            }
            if positions[debtor].outstanding.abs() < tolerance {
                debtor -= 1;
                continue;
            }

            let owed_to = positions[creditor].outstanding;
            let owed_by = positions[debtor].outstanding;
            if owed_to >= Decimal::ZERO || owed_by <= Decimal::ZERO {
                break;
            }

            let amount = self.config.round(owed_to.abs().min(owed_by));
            let (from, to) = (positions[debtor].participant, positions[creditor].participant);
            debug!("{} pays {} {}", from.id, to.id, amount);
            transactions.push(Transaction {
                from: from.id.clone(),
                from_name: from.name.clone(),
                to: to.id.clone(),
                to_name: to.name.clone(),
                amount,
            });

            positions[debtor].outstanding -= amount;
            positions[creditor].outstanding += amount;
        }

        Ok(transactions)
    }
}
