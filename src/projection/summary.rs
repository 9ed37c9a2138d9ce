//! Scalar report metrics reduced from a projection

use serde::Serialize;

use super::{ProjectionSeries, WithdrawalSchedule};
use crate::assumptions::MonthlyRates;

/// Headline figures for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionSummary {
    /// With-withdrawal balance at the horizon
    pub final_balance: f64,
    /// Sum of scheduled withdrawals over months `1..=total_months`
    pub total_withdrawn: f64,
    /// Net monthly return as a percentage
    pub effective_monthly_net_rate: f64,
    /// First month the with-withdrawal balance was floored at zero
    pub depletion_month: Option<u32>,
}

impl ProjectionSummary {
    /// Reduce a finished series
    ///
    /// `total_withdrawn` is taken from the same schedule the recurrence used,
    /// so indexing cannot drift between the two. Scheduled amounts still
    /// count after depletion.
    pub fn aggregate(
        series: &ProjectionSeries,
        schedule: &WithdrawalSchedule,
        rates: &MonthlyRates,
        total_months: u32,
        depletion_month: Option<u32>,
    ) -> Self {
        Self {
            final_balance: series.last().map(|r| r.balance_with_withdrawal).unwrap_or(0.0),
            total_withdrawn: schedule.total(total_months),
            effective_monthly_net_rate: rates.net_return_pct(),
            depletion_month,
        }
    }
}
