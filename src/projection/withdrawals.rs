//! Monthly withdrawal schedule shared by the recurrence and the summary

use serde::Serialize;

use super::ProjectionInput;
use crate::assumptions::MonthlyRates;

/// Withdrawal amount for each projection month
///
/// Month `i` (1-indexed) withdraws `base * (1 + inflation)^i` when indexed,
/// otherwise `base`. Negative amounts are contributions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WithdrawalSchedule {
    base_amount: f64,
    monthly_inflation: f64,
    indexed: bool,
}

impl WithdrawalSchedule {
    pub fn new(base_amount: f64, monthly_inflation: f64, indexed: bool) -> Self {
        Self {
            base_amount,
            monthly_inflation,
            indexed,
        }
    }

    pub fn from_input(input: &ProjectionInput, rates: &MonthlyRates) -> Self {
        Self::new(
            input.monthly_withdrawal,
            rates.inflation_rate,
            input.index_withdrawal_to_inflation,
        )
    }

    /// Amount withdrawn in projection month `month`
    pub fn amount(&self, month: u32) -> f64 {
        if self.indexed {
            self.base_amount * (1.0 + self.monthly_inflation).powi(month as i32)
        } else {
            self.base_amount
        }
    }

    /// Sum of scheduled amounts over months `1..=months`
    pub fn total(&self, months: u32) -> f64 {
        (1..=months).map(|month| self.amount(month)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_schedule() {
        let schedule = WithdrawalSchedule::new(5_000.0, 0.003675, false);
        assert_eq!(schedule.amount(1), 5_000.0);
        assert_eq!(schedule.amount(240), 5_000.0);
        assert_relative_eq!(schedule.total(120), 600_000.0);
    }

    #[test]
    fn test_indexed_exponent_starts_at_one() {
        let inflation = 0.003674809;
        let schedule = WithdrawalSchedule::new(5_000.0, inflation, true);

        // First month already carries one month of inflation
        assert_relative_eq!(schedule.amount(1), 5_000.0 * (1.0 + inflation));
        assert_relative_eq!(schedule.amount(12), 5_000.0 * 1.045, max_relative = 1e-7);
    }

    #[test]
    fn test_indexed_total_matches_geometric_sum() {
        let inflation = 0.004;
        let schedule = WithdrawalSchedule::new(1_000.0, inflation, true);
        let g = 1.0 + inflation;
        // sum_{i=1..n} g^i = g (g^n - 1) / (g - 1)
        let expected = 1_000.0 * g * (g.powi(24) - 1.0) / (g - 1.0);
        assert_relative_eq!(schedule.total(24), expected, max_relative = 1e-10);
    }

    #[test]
    fn test_contribution_is_negative() {
        let schedule = WithdrawalSchedule::new(-5_000.0, 0.0, true);
        assert_eq!(schedule.amount(3), -5_000.0);
        assert_eq!(schedule.total(4), -20_000.0);
    }

    #[test]
    fn test_zero_months_total() {
        let schedule = WithdrawalSchedule::new(5_000.0, 0.01, true);
        assert_eq!(schedule.total(0), 0.0);
    }
}
