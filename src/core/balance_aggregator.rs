//! Balance aggregation module
//!
//! This module provides the `BalanceAggregator`, which folds every expense's
//! paid amount and computed shares into one net balance per participant.
//!
//! A positive balance means the participant owes money; a negative balance
//! means the participant is owed money.

use crate::core::split_calculator::SplitCalculator;
use crate::types::{Expense, Participant, ParticipantBalance, SettlementError};
use std::collections::HashMap;
use tracing::debug;

/// Folds expenses into per-participant paid/share/balance totals
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceAggregator {
    calculator: SplitCalculator,
}

impl BalanceAggregator {
    /// Create a new BalanceAggregator around a split calculator
    pub fn new(calculator: SplitCalculator) -> Self {
        BalanceAggregator { calculator }
    }

    /// Aggregate all expenses into one balance entry per participant
    ///
    /// Entries are returned in the same order as `participants`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any expense cannot be split (see [`SplitCalculator::compute_shares`])
    /// - An expense's payer is not a participant of the trip (`UnknownParticipant`)
    /// - A running total overflows (`ArithmeticOverflow`)
    pub fn aggregate(
        &self,
        participants: &[Participant],
        expenses: &[Expense],
    ) -> Result<Vec<ParticipantBalance>, SettlementError> {
        let mut balances: Vec<ParticipantBalance> =
            participants.iter().map(ParticipantBalance::new).collect();
        let index: HashMap<&str, usize> = participants
            .iter()
            .enumerate()
            .map(|(position, participant)| (participant.id.as_str(), position))
            .collect();

        for expense in expenses {
            // Split first so an empty trip reports EmptyParticipantSet rather
            // than an unknown payer.
            let shares = self.calculator.compute_shares(expense, participants)?;

            let payer = *index
                .get(expense.paid_by.as_str())
                .ok_or_else(|| SettlementError::unknown_participant(&expense.paid_by, &expense.id))?;
            let entry = &mut balances[payer];
            entry.paid = entry
                .paid
                .checked_add(expense.amount)
                .ok_or_else(|| SettlementError::arithmetic_overflow("paid total"))?;

            for (id, owed) in &shares {
                let position = *index
                    .get(id.as_str())
                    .ok_or_else(|| SettlementError::unknown_participant(id, &expense.id))?;
                let entry = &mut balances[position];
                entry.share = entry
                    .share
                    .checked_add(*owed)
                    .ok_or_else(|| SettlementError::arithmetic_overflow("share total"))?;
            }

            debug!(
                "Expense {} ({}) of {} paid by {} split across {} participants",
                expense.id,
                expense.policy.split_type(),
                expense.amount,
                expense.paid_by,
                shares.len()
            );
        }

        for entry in &mut balances {
            entry.balance = entry
                .share
                .checked_sub(entry.paid)
                .ok_or_else(|| SettlementError::arithmetic_overflow("balance"))?;
        }

        Ok(balances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{EngineConfig, ValidationMode};
    use crate::types::SplitPolicy;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::{BTreeMap, BTreeSet};

    fn aggregator() -> BalanceAggregator {
        BalanceAggregator::new(SplitCalculator::new(EngineConfig::default()))
    }

    fn trip(ids: &[&str]) -> Vec<Participant> {
        ids.iter()
            .map(|id| Participant::new(*id, id.to_uppercase()))
            .collect()
    }

    fn balance_of<'a>(balances: &'a [ParticipantBalance], id: &str) -> &'a ParticipantBalance {
        balances.iter().find(|b| b.id == id).unwrap()
    }

    #[rstest]
    #[case::two_people_equal(
        &["a", "b"],
        vec![Expense::new("e1", "a", dec!(100), SplitPolicy::Equal)],
        vec![("a", dec!(-50)), ("b", dec!(50))]
    )]
    #[case::three_people_equal(
        &["a", "b", "c"],
        vec![Expense::new("e1", "a", dec!(90), SplitPolicy::Equal)],
        vec![("a", dec!(-60)), ("b", dec!(30)), ("c", dec!(30))]
    )]
    #[case::percentage(
        &["a", "b"],
        vec![Expense::new(
            "e1",
            "a",
            dec!(200),
            SplitPolicy::Percentage(BTreeMap::from([
                ("a".to_string(), dec!(50)),
                ("b".to_string(), dec!(50)),
            ])),
        )],
        vec![("a", dec!(-100)), ("b", dec!(100))]
    )]
    #[case::exclude(
        &["a", "b", "c"],
        vec![Expense::new(
            "e1",
            "a",
            dec!(60),
            SplitPolicy::Exclude(BTreeSet::from(["c".to_string()])),
        )],
        vec![("a", dec!(-30)), ("b", dec!(30)), ("c", dec!(0))]
    )]
    #[case::payments_cancel_out(
        &["a", "b"],
        vec![
            Expense::new("e1", "a", dec!(40), SplitPolicy::Equal),
            Expense::new("e2", "b", dec!(40), SplitPolicy::Equal),
        ],
        vec![("a", dec!(0)), ("b", dec!(0))]
    )]
    fn test_aggregate_balances(
        #[case] ids: &[&str],
        #[case] expenses: Vec<Expense>,
        #[case] expected: Vec<(&str, Decimal)>,
    ) {
        let balances = aggregator().aggregate(&trip(ids), &expenses).unwrap();

        for (id, balance) in expected {
            assert_eq!(balance_of(&balances, id).balance, balance, "balance of {}", id);
        }
        assert_eq!(
            balances.iter().map(|b| b.balance).sum::<Decimal>(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_paid_and_share_are_tracked_separately() {
        let expenses = vec![
            Expense::new("e1", "a", dec!(100), SplitPolicy::Equal),
            Expense::new("e2", "b", dec!(30), SplitPolicy::Equal),
        ];
        let balances = aggregator().aggregate(&trip(&["a", "b"]), &expenses).unwrap();

        let a = balance_of(&balances, "a");
        assert_eq!(a.paid, dec!(100));
        assert_eq!(a.share, dec!(65));
        assert_eq!(a.balance, dec!(-35));
        assert_eq!(a.name, "A");

        let b = balance_of(&balances, "b");
        assert_eq!(b.paid, dec!(30));
        assert_eq!(b.share, dec!(65));
        assert_eq!(b.balance, dec!(35));
    }

    #[test]
    fn test_preserves_participant_order() {
        let balances = aggregator().aggregate(&trip(&["c", "a", "b"]), &[]).unwrap();
        let ids: Vec<&str> = balances.iter().map(|b| b.id.as_str()).collect();

        assert_eq!(ids, vec!["c", "a", "b"]);
        assert!(balances.iter().all(|b| b.balance.is_zero()));
    }

    #[test]
    fn test_unknown_payer_rejected() {
        let expenses = vec![Expense::new("e1", "ghost", dec!(10), SplitPolicy::Equal)];
        let result = aggregator().aggregate(&trip(&["a", "b"]), &expenses);

        assert_eq!(
            result,
            Err(SettlementError::unknown_participant("ghost", "e1"))
        );
    }

    #[test]
    fn test_empty_trip_reports_empty_participant_set() {
        let expenses = vec![Expense::new("e1", "a", dec!(10), SplitPolicy::Equal)];
        let result = aggregator().aggregate(&[], &expenses);

        assert_eq!(result, Err(SettlementError::empty_participant_set("e1")));
    }

    #[test]
    fn test_balance_overflow_is_an_error() {
        let lenient = BalanceAggregator::new(SplitCalculator::new(EngineConfig::new(
            2,
            ValidationMode::Lenient,
        )));
        let expenses = vec![
            Expense::new(
                "e1",
                "b",
                dec!(0),
                SplitPolicy::Custom(BTreeMap::from([("a".to_string(), Decimal::MIN)])),
            ),
            Expense::new(
                "e2",
                "a",
                dec!(1),
                SplitPolicy::Custom(BTreeMap::from([("b".to_string(), dec!(1))])),
            ),
        ];
        let result = lenient.aggregate(&trip(&["a", "b"]), &expenses);

        assert_eq!(result, Err(SettlementError::arithmetic_overflow("balance")));
    }

    #[test]
    fn test_uneven_split_still_conserves() {
        let expenses = vec![
            Expense::new("e1", "a", dec!(100), SplitPolicy::Equal),
            Expense::new("e2", "b", dec!(10.01), SplitPolicy::Equal),
            Expense::new("e3", "c", dec!(0.02), SplitPolicy::Equal),
        ];
        let balances = aggregator()
            .aggregate(&trip(&["a", "b", "c"]), &expenses)
            .unwrap();

        assert_eq!(
            balances.iter().map(|b| b.balance).sum::<Decimal>(),
            Decimal::ZERO
        );
    }
}
