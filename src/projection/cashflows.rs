//! Projected series and run results

use chrono::NaiveDate;
use serde::Serialize;

use super::ProjectionSummary;
use crate::assumptions::MonthlyRates;

/// One month of the projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionRow {
    /// Months elapsed since the start date (0 is the opening row)
    pub month_index: u32,
    pub date: NaiveDate,
    /// Withdrawal scheduled for this month (negative for contributions, 0 at month 0)
    pub withdrawal: f64,
    pub balance_no_withdrawal: f64,
    pub balance_with_withdrawal: f64,
    pub band_upper: f64,
    pub band_lower: f64,
}

impl ProjectionRow {
    /// Month-0 row: every balance equals the starting wealth
    pub fn opening(date: NaiveDate, initial_wealth: f64) -> Self {
        Self {
            month_index: 0,
            date,
            withdrawal: 0.0,
            balance_no_withdrawal: initial_wealth,
            balance_with_withdrawal: initial_wealth,
            band_upper: initial_wealth,
            band_lower: initial_wealth,
        }
    }
}

/// Ordered month-by-month projection, month 0 through the horizon
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProjectionSeries {
    rows: Vec<ProjectionRow>,
}

impl ProjectionSeries {
    pub fn new(rows: Vec<ProjectionRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ProjectionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&ProjectionRow> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&ProjectionRow> {
        self.rows.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectionRow> {
        self.rows.iter()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }
}

impl<'a> IntoIterator for &'a ProjectionSeries {
    type Item = &'a ProjectionRow;
    type IntoIter = std::slice::Iter<'a, ProjectionRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Complete output of one projection run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub total_months: u32,
    pub rates: MonthlyRates,
    pub series: ProjectionSeries,
    pub summary: ProjectionSummary,
}
