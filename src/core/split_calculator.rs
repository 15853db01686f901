//! Split calculation module
//!
//! This module provides the `SplitCalculator`, which turns one expense into a
//! mapping from participant to owed share according to the expense's split
//! policy.
//!
//! # Rounding
//!
//! Every share is rounded half-up to the minor currency unit. For even splits
//! (EQUAL and EXCLUDE) the rounding residual is added to the first included
//! participant in ID order, so the shares always add up to the expense amount
//! exactly.
//!
//! CUSTOM and PERCENTAGE details are checked against the expense amount in
//! amount space, before rounding. A gap wider than one minor unit is a
//! `SplitDetailMismatch`. Otherwise whatever the rounded shares are short or
//! over goes to the first listed participant the same way.

use crate::core::config::EngineConfig;
use crate::types::{Expense, Participant, ParticipantId, SettlementError, SplitPolicy};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Owed amount per participant for a single expense, in participant ID order
pub type Shares = BTreeMap<ParticipantId, Decimal>;

/// Computes per-participant shares for individual expenses
///
/// Pure: holds only configuration and never mutates its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitCalculator {
    config: EngineConfig,
}

impl SplitCalculator {
    /// Create a new SplitCalculator
    pub fn new(config: EngineConfig) -> Self {
        SplitCalculator { config }
    }

    /// Compute the owed share of every affected participant for one expense
    ///
    /// # Arguments
    ///
    /// * `expense` - The expense to split
    /// * `participants` - All participants of the trip
    ///
    /// # Returns
    ///
    /// * `Ok(Shares)` - Owed amount per participant; participants not listed owe nothing
    /// * `Err(SettlementError)` - If the expense cannot be split
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `participants` is empty (`EmptyParticipantSet`)
    /// - The expense amount is negative (`InvalidAmount`)
    /// - In strict mode, split details name unknown participants, are out of
    ///   range, or do not add up (`UnknownParticipant`, `InvalidSplitDetail`,
    ///   `SplitDetailMismatch`)
    pub fn compute_shares(
        &self,
        expense: &Expense,
        participants: &[Participant],
    ) -> Result<Shares, SettlementError> {
        if participants.is_empty() {
            return Err(SettlementError::empty_participant_set(&expense.id));
        }

        if expense.amount < Decimal::ZERO {
            return Err(SettlementError::invalid_amount(
                &expense.amount.to_string(),
                &expense.id,
            ));
        }

        let known: BTreeSet<&str> = participants.iter().map(|p| p.id.as_str()).collect();

        match &expense.policy {
            SplitPolicy::Equal => {
                self.split_evenly(expense, participants.iter().map(|p| &p.id).collect())
            }
            SplitPolicy::Custom(amounts) => self.custom_shares(expense, amounts, &known),
            SplitPolicy::Percentage(percentages) => {
                self.percentage_shares(expense, percentages, &known)
            }
            SplitPolicy::Exclude(excluded) => {
                for id in excluded {
                    if !known.contains(id.as_str()) {
                        self.flag(SettlementError::unknown_participant(id, &expense.id))?;
                    }
                }

                let included: Vec<&ParticipantId> = participants
                    .iter()
                    .map(|p| &p.id)
                    .filter(|id| !excluded.contains(*id))
                    .collect();

                if included.is_empty() {
                    warn!(
                        "Expense {} excludes every participant, no shares produced",
                        expense.id
                    );
                    return Ok(Shares::new());
                }

                self.split_evenly(expense, included)
            }
        }
    }

    /// Split the amount evenly, assigning the rounding residual to the first ID
    fn split_evenly(
        &self,
        expense: &Expense,
        included: Vec<&ParticipantId>,
    ) -> Result<Shares, SettlementError> {
        let count = Decimal::from(included.len());
        let each = expense
            .amount
            .checked_div(count)
            .map(|share| self.config.round(share))
            .ok_or_else(|| SettlementError::arithmetic_overflow("even split"))?;
        let residue = each
            .checked_mul(count)
            .and_then(|allotted| expense.amount.checked_sub(allotted))
            .ok_or_else(|| SettlementError::arithmetic_overflow("even split"))?;

        let mut shares: Shares = included.into_iter().map(|id| (id.clone(), each)).collect();
        if let Some(mut first) = shares.first_entry() {
            *first.get_mut() += residue;
        }

        Ok(shares)
    }

    fn custom_shares(
        &self,
        expense: &Expense,
        amounts: &BTreeMap<ParticipantId, Decimal>,
        known: &BTreeSet<&str>,
    ) -> Result<Shares, SettlementError> {
        let mut shares = Shares::new();
        let mut exact = Decimal::ZERO;

        for (id, amount) in amounts {
            if *amount < Decimal::ZERO {
                self.flag(SettlementError::invalid_split_detail(
                    &format!("{}:{}", id, amount),
                    &expense.id,
                    "negative amount",
                ))?;
            }
            if !known.contains(id.as_str()) {
                self.flag(SettlementError::unknown_participant(id, &expense.id))?;
                continue;
            }
            exact = exact
                .checked_add(*amount)
                .ok_or_else(|| SettlementError::arithmetic_overflow("custom split"))?;
            shares.insert(id.clone(), self.config.round(*amount));
        }

        self.reconcile(expense, shares, exact, "custom split")
    }

    fn percentage_shares(
        &self,
        expense: &Expense,
        percentages: &BTreeMap<ParticipantId, Decimal>,
        known: &BTreeSet<&str>,
    ) -> Result<Shares, SettlementError> {
        let mut shares = Shares::new();
        let mut percent_total = Decimal::ZERO;
        let mut exact = Decimal::ZERO;

        for (id, percent) in percentages {
            if *percent < Decimal::ZERO || *percent > Decimal::ONE_HUNDRED {
                self.flag(SettlementError::invalid_split_detail(
                    &format!("{}:{}", id, percent),
                    &expense.id,
                    "percentage outside 0-100",
                ))?;
            }
            if !known.contains(id.as_str()) {
                self.flag(SettlementError::unknown_participant(id, &expense.id))?;
                continue;
            }

            percent_total = percent_total
                .checked_add(*percent)
                .ok_or_else(|| SettlementError::arithmetic_overflow("percentage total"))?;
            let owed = expense
                .amount
                .checked_mul(*percent)
                .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
                .ok_or_else(|| SettlementError::arithmetic_overflow("percentage split"))?;
            exact = exact
                .checked_add(owed)
                .ok_or_else(|| SettlementError::arithmetic_overflow("percentage split"))?;
            shares.insert(id.clone(), self.config.round(owed));
        }

        let off_by = percent_total
            .checked_sub(Decimal::ONE_HUNDRED)
            .ok_or_else(|| SettlementError::arithmetic_overflow("percentage total"))?;
        if off_by.abs() > self.config.tolerance() {
            self.flag(SettlementError::split_detail_mismatch(
                &expense.id,
                Decimal::ONE_HUNDRED,
                percent_total,
            ))?;
        }

        self.reconcile(expense, shares, exact, "percentage split")
    }

    /// Check the unrounded share total against the expense amount
    ///
    /// `exact` is the sum of the shares before rounding. If it is more than ε
    /// away from the amount the details are flagged as a mismatch and the
    /// shares are left as they are. Otherwise the rounding residue is added to
    /// the first entry so the shares sum to the amount exactly.
    fn reconcile(
        &self,
        expense: &Expense,
        mut shares: Shares,
        exact: Decimal,
        operation: &str,
    ) -> Result<Shares, SettlementError> {
        let gap = expense
            .amount
            .checked_sub(exact)
            .ok_or_else(|| SettlementError::arithmetic_overflow(operation))?;
        if gap.abs() > self.config.tolerance() {
            self.flag(SettlementError::split_detail_mismatch(
                &expense.id,
                expense.amount,
                exact,
            ))?;
            return Ok(shares);
        }

        let residue = sum(shares.values(), operation)
            .and_then(|allotted| {
                expense
                    .amount
                    .checked_sub(allotted)
                    .ok_or_else(|| SettlementError::arithmetic_overflow(operation))
            })?;
        if let Some(mut first) = shares.first_entry() {
            *first.get_mut() += residue;
        }

        Ok(shares)
    }

    /// Strict mode turns a finding into an error; lenient mode logs it
    fn flag(&self, error: SettlementError) -> Result<(), SettlementError> {
        if self.config.is_strict() {
            return Err(error);
        }
        warn!("Ignoring split detail problem: {}", error);
        Ok(())
    }
}

/// Checked sum of decimal values
pub(crate) fn sum<'a>(
    values: impl IntoIterator<Item = &'a Decimal>,
    operation: &str,
) -> Result<Decimal, SettlementError> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value))
        .ok_or_else(|| SettlementError::arithmetic_overflow(operation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ValidationMode;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn trip(ids: &[&str]) -> Vec<Participant> {
        ids.iter()
            .map(|id| Participant::new(*id, id.to_uppercase()))
            .collect()
    }

    fn detail_map(entries: &[(&str, Decimal)]) -> BTreeMap<ParticipantId, Decimal> {
        entries
            .iter()
            .map(|(id, value)| (id.to_string(), *value))
            .collect()
    }

    fn excluded(ids: &[&str]) -> BTreeSet<ParticipantId> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn strict() -> SplitCalculator {
        SplitCalculator::new(EngineConfig::default())
    }

    fn lenient() -> SplitCalculator {
        SplitCalculator::new(EngineConfig::new(2, ValidationMode::Lenient))
    }

    fn owed(shares: &Shares) -> Vec<(&str, Decimal)> {
        shares.iter().map(|(id, v)| (id.as_str(), *v)).collect()
    }

    #[rstest]
    #[case::two_way(&["a", "b"], dec!(100), vec![("a", dec!(50.00)), ("b", dec!(50.00))])]
    #[case::three_way(&["a", "b", "c"], dec!(90), vec![("a", dec!(30.00)), ("b", dec!(30.00)), ("c", dec!(30.00))])]
    #[case::residual_cent_to_first(&["a", "b", "c"], dec!(100), vec![("a", dec!(33.34)), ("b", dec!(33.33)), ("c", dec!(33.33))])]
    #[case::rounded_up_then_corrected(&["a", "b", "c"], dec!(200), vec![("a", dec!(66.66)), ("b", dec!(66.67)), ("c", dec!(66.67))])]
    #[case::residual_by_id_not_input_order(&["c", "b", "a"], dec!(100), vec![("a", dec!(33.34)), ("b", dec!(33.33)), ("c", dec!(33.33))])]
    #[case::zero_amount(&["a", "b"], dec!(0), vec![("a", dec!(0.00)), ("b", dec!(0.00))])]
    fn test_equal_split(
        #[case] ids: &[&str],
        #[case] amount: Decimal,
        #[case] expected: Vec<(&str, Decimal)>,
    ) {
        let expense = Expense::new("e1", "a", amount, SplitPolicy::Equal);
        let shares = strict().compute_shares(&expense, &trip(ids)).unwrap();

        assert_eq!(owed(&shares), expected);
        assert_eq!(shares.values().sum::<Decimal>(), amount);
    }

    #[rstest]
    #[case::equal(SplitPolicy::Equal)]
    #[case::custom(SplitPolicy::Custom(BTreeMap::new()))]
    #[case::percentage(SplitPolicy::Percentage(BTreeMap::new()))]
    #[case::exclude(SplitPolicy::Exclude(BTreeSet::new()))]
    fn test_empty_participant_set(#[case] policy: SplitPolicy) {
        let expense = Expense::new("e1", "a", dec!(100), policy);
        let result = strict().compute_shares(&expense, &[]);

        assert_eq!(result, Err(SettlementError::empty_participant_set("e1")));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let expense = Expense::new("e1", "a", dec!(-10), SplitPolicy::Equal);
        let result = strict().compute_shares(&expense, &trip(&["a"]));

        assert!(matches!(result, Err(SettlementError::InvalidAmount { .. })));
    }

    #[test]
    fn test_custom_split_absent_participants_owe_nothing() {
        let policy = SplitPolicy::Custom(detail_map(&[("a", dec!(70)), ("b", dec!(30))]));
        let expense = Expense::new("e1", "a", dec!(100), policy);
        let shares = strict()
            .compute_shares(&expense, &trip(&["a", "b", "c"]))
            .unwrap();

        assert_eq!(owed(&shares), vec![("a", dec!(70.00)), ("b", dec!(30.00))]);
        assert!(!shares.contains_key("c"));
    }

    #[rstest]
    #[case::short(dec!(50))]
    #[case::over(dec!(140))]
    fn test_custom_split_mismatch(#[case] b_amount: Decimal) {
        let policy = SplitPolicy::Custom(detail_map(&[("a", dec!(40)), ("b", b_amount)]));
        let expense = Expense::new("e1", "a", dec!(100), policy);

        let strict_result = strict().compute_shares(&expense, &trip(&["a", "b"]));
        assert!(matches!(
            strict_result,
            Err(SettlementError::SplitDetailMismatch { .. })
        ));

        let lenient_result = lenient().compute_shares(&expense, &trip(&["a", "b"]));
        assert_eq!(lenient_result.unwrap().len(), 2);
    }

    #[rstest]
    #[case::one_cent_short(dec!(49.99), vec![("a", dec!(50.01)), ("b", dec!(49.99))])]
    #[case::one_cent_over(dec!(50.01), vec![("a", dec!(49.99)), ("b", dec!(50.01))])]
    #[case::sub_cent_detail(dec!(49.995), vec![("a", dec!(50.00)), ("b", dec!(50.00))])]
    fn test_custom_split_residue_goes_to_first_id(
        #[case] b_amount: Decimal,
        #[case] expected: Vec<(&str, Decimal)>,
    ) {
        let policy = SplitPolicy::Custom(detail_map(&[("a", dec!(50)), ("b", b_amount)]));
        let expense = Expense::new("e1", "b", dec!(100), policy);
        let shares = strict()
            .compute_shares(&expense, &trip(&["a", "b"]))
            .unwrap();

        assert_eq!(owed(&shares), expected);
        assert_eq!(shares.values().sum::<Decimal>(), dec!(100));
    }

    #[test]
    fn test_custom_split_two_cents_off_is_mismatch() {
        let policy = SplitPolicy::Custom(detail_map(&[("a", dec!(50)), ("b", dec!(49.98))]));
        let expense = Expense::new("e1", "a", dec!(100), policy);

        let result = strict().compute_shares(&expense, &trip(&["a", "b"]));
        assert_eq!(
            result,
            Err(SettlementError::split_detail_mismatch(
                "e1",
                dec!(100),
                dec!(99.98)
            ))
        );
    }

    #[test]
    fn test_custom_split_unknown_participant() {
        let policy = SplitPolicy::Custom(detail_map(&[("a", dec!(50)), ("zed", dec!(50))]));
        let expense = Expense::new("e1", "a", dec!(100), policy);

        let result = strict().compute_shares(&expense, &trip(&["a", "b"]));
        assert_eq!(
            result,
            Err(SettlementError::unknown_participant("zed", "e1"))
        );
    }

    #[test]
    fn test_lenient_mode_drops_unknown_participants() {
        let policy = SplitPolicy::Custom(detail_map(&[("a", dec!(100)), ("zed", dec!(0))]));
        let expense = Expense::new("e1", "a", dec!(100), policy);

        let shares = lenient()
            .compute_shares(&expense, &trip(&["a", "b"]))
            .unwrap();
        assert_eq!(owed(&shares), vec![("a", dec!(100.00))]);
    }

    #[test]
    fn test_negative_custom_amount_is_invalid_in_strict_mode() {
        let policy = SplitPolicy::Custom(detail_map(&[("a", dec!(110)), ("b", dec!(-10))]));
        let expense = Expense::new("e1", "a", dec!(100), policy);

        let result = strict().compute_shares(&expense, &trip(&["a", "b"]));
        assert!(matches!(
            result,
            Err(SettlementError::InvalidSplitDetail { .. })
        ));
    }

    #[rstest]
    #[case::halves(
        dec!(200),
        &[("a", dec!(50)), ("b", dec!(50))],
        vec![("a", dec!(100.00)), ("b", dec!(100.00))]
    )]
    #[case::thirds_residual_to_first(
        dec!(10),
        &[("a", dec!(33.33)), ("b", dec!(33.33)), ("c", dec!(33.34))],
        vec![("a", dec!(3.34)), ("b", dec!(3.33)), ("c", dec!(3.33))]
    )]
    #[case::subset_of_trip(
        dec!(80),
        &[("b", dec!(100))],
        vec![("b", dec!(80.00))]
    )]
    fn test_percentage_split(
        #[case] amount: Decimal,
        #[case] details: &[(&str, Decimal)],
        #[case] expected: Vec<(&str, Decimal)>,
    ) {
        let policy = SplitPolicy::Percentage(detail_map(details));
        let expense = Expense::new("e1", "a", amount, policy);
        let shares = strict()
            .compute_shares(&expense, &trip(&["a", "b", "c"]))
            .unwrap();

        assert_eq!(owed(&shares), expected);
        assert_eq!(shares.values().sum::<Decimal>(), amount);
    }

    #[test]
    fn test_percentage_split_must_total_one_hundred() {
        let policy = SplitPolicy::Percentage(detail_map(&[("a", dec!(50)), ("b", dec!(40))]));
        let expense = Expense::new("e1", "a", dec!(200), policy);

        let result = strict().compute_shares(&expense, &trip(&["a", "b"]));
        assert_eq!(
            result,
            Err(SettlementError::split_detail_mismatch(
                "e1",
                Decimal::ONE_HUNDRED,
                dec!(90)
            ))
        );
    }

    #[test]
    fn test_percentage_within_percent_tolerance_checked_against_amount() {
        let policy = SplitPolicy::Percentage(detail_map(&[("a", dec!(99.995))]));
        let expense = Expense::new("e1", "a", dec!(100000), policy);

        let result = strict().compute_shares(&expense, &trip(&["a", "b"]));
        assert_eq!(
            result,
            Err(SettlementError::split_detail_mismatch(
                "e1",
                dec!(100000),
                dec!(99995.00)
            ))
        );
    }

    #[test]
    fn test_percentage_sub_cent_gap_goes_to_first_id() {
        let policy = SplitPolicy::Percentage(detail_map(&[
            ("a", dec!(33.333)),
            ("b", dec!(33.333)),
            ("c", dec!(33.333)),
        ]));
        let expense = Expense::new("e1", "a", dec!(1), policy);
        let shares = strict()
            .compute_shares(&expense, &trip(&["a", "b", "c"]))
            .unwrap();

        assert_eq!(
            owed(&shares),
            vec![("a", dec!(0.34)), ("b", dec!(0.33)), ("c", dec!(0.33))]
        );
        assert_eq!(shares.values().sum::<Decimal>(), dec!(1));
    }

    #[test]
    fn test_percentage_rounding_residue_wider_than_a_cent() {
        let mut details = vec![("a", dec!(16))];
        details.extend(["b", "c", "d", "e", "f", "g"].map(|id| (id, dec!(14))));
        let ids = ["a", "b", "c", "d", "e", "f", "g"];

        let policy = SplitPolicy::Percentage(detail_map(&details));
        let expense = Expense::new("e1", "a", dec!(0.10), policy);
        let shares = strict().compute_shares(&expense, &trip(&ids)).unwrap();

        assert_eq!(shares["a"], dec!(0.04));
        assert!(ids[1..].iter().all(|id| shares[*id] == dec!(0.01)));
        assert_eq!(shares.values().sum::<Decimal>(), dec!(0.10));
    }

    #[test]
    fn test_percentage_out_of_range() {
        let policy = SplitPolicy::Percentage(detail_map(&[("a", dec!(150)), ("b", dec!(-50))]));
        let expense = Expense::new("e1", "a", dec!(200), policy);

        let result = strict().compute_shares(&expense, &trip(&["a", "b"]));
        assert!(matches!(
            result,
            Err(SettlementError::InvalidSplitDetail { .. })
        ));
    }

    #[rstest]
    #[case::one_excluded(&["c"], vec![("a", dec!(30.00)), ("b", dec!(30.00))])]
    #[case::none_excluded(&[], vec![("a", dec!(20.00)), ("b", dec!(20.00)), ("c", dec!(20.00))])]
    #[case::everyone_excluded(&["a", "b", "c"], vec![])]
    fn test_exclude_split(#[case] skip: &[&str], #[case] expected: Vec<(&str, Decimal)>) {
        let expense = Expense::new("e1", "a", dec!(60), SplitPolicy::Exclude(excluded(skip)));
        let shares = strict()
            .compute_shares(&expense, &trip(&["a", "b", "c"]))
            .unwrap();

        assert_eq!(owed(&shares), expected);
    }

    #[test]
    fn test_exclude_unknown_participant() {
        let expense = Expense::new(
            "e1",
            "a",
            dec!(60),
            SplitPolicy::Exclude(excluded(&["ghost"])),
        );

        let result = strict().compute_shares(&expense, &trip(&["a", "b"]));
        assert_eq!(
            result,
            Err(SettlementError::unknown_participant("ghost", "e1"))
        );

        let shares = lenient()
            .compute_shares(&expense, &trip(&["a", "b"]))
            .unwrap();
        assert_eq!(owed(&shares), vec![("a", dec!(30.00)), ("b", dec!(30.00))]);
    }
}
