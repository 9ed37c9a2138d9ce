//! Immutable per-run projection input

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assumptions::months_between;
use crate::error::ProjectionError;

/// Everything one projection run needs
///
/// All rates are fractional annual rates (0.12 for 12%). There are no
/// defaults here; callers that gather input own those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Starting balance, must be non-negative
    pub initial_wealth: f64,
    pub start_date: NaiveDate,
    /// Must fall in a later calendar month than `start_date`
    pub end_date: NaiveDate,
    /// Expected nominal return before tax
    pub annual_return: f64,
    pub annual_inflation: f64,
    /// Tax charged on returns
    pub annual_tax: f64,
    /// Width of the uncertainty band; used by magnitude
    pub annual_volatility: f64,
    /// Withdrawn each month; negative values are contributions
    pub monthly_withdrawal: f64,
    /// Escalate the withdrawal by accumulated inflation each month
    pub index_withdrawal_to_inflation: bool,
}

impl ProjectionInput {
    /// Number of monthly steps between start and end
    ///
    /// # Errors
    /// `InvalidHorizon` when the end date is not in a later calendar month.
    pub fn total_months(&self) -> Result<u32, ProjectionError> {
        let months = months_between(self.start_date, self.end_date);
        let invalid = || ProjectionError::InvalidHorizon {
            start: self.start_date,
            end: self.end_date,
            months,
        };
        if months <= 0 {
            return Err(invalid());
        }
        u32::try_from(months).map_err(|_| invalid())
    }

    /// Reject non-finite scalars and a negative starting balance
    pub fn validate(&self) -> Result<(), ProjectionError> {
        let fields = [
            ("initial_wealth", self.initial_wealth),
            ("annual_return", self.annual_return),
            ("annual_inflation", self.annual_inflation),
            ("annual_tax", self.annual_tax),
            ("annual_volatility", self.annual_volatility),
            ("monthly_withdrawal", self.monthly_withdrawal),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ProjectionError::InvalidInput { field, value });
            }
        }

        if self.initial_wealth < 0.0 {
            return Err(ProjectionError::InvalidInput {
                field: "initial_wealth",
                value: self.initial_wealth,
            });
        }

        Ok(())
    }
}
