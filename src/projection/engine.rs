//! Month-by-month projection recurrence

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{
    ProjectionInput, ProjectionResult, ProjectionRow, ProjectionSeries, ProjectionState,
    ProjectionSummary, WithdrawalSchedule,
};
use crate::assumptions::{month_offset, MonthlyRates, MONTHS_PER_YEAR};
use crate::error::ProjectionError;

/// How the annual volatility turns into a band half-width
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityScaling {
    /// `vol * sqrt(months / 12)`: the band widens with elapsed years
    #[default]
    SquareRootOfTime,
    /// `vol / sqrt(12)` every month: a constant one-month band
    Flat,
}

impl VolatilityScaling {
    /// Fraction of the current balance used as the band half-width at `month`
    ///
    /// Volatility is taken by magnitude so the band never inverts.
    pub fn band_fraction(&self, annual_volatility: f64, month: u32) -> f64 {
        let vol = annual_volatility.abs();
        let periods = MONTHS_PER_YEAR as f64;
        match self {
            VolatilityScaling::SquareRootOfTime => vol * (month as f64 / periods).sqrt(),
            VolatilityScaling::Flat => vol / periods.sqrt(),
        }
    }
}

/// Engine-level options that are not part of a single input snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default)]
    pub volatility_scaling: VolatilityScaling,
}

/// Projection engine
///
/// Holds no per-run state; one engine can project any number of inputs,
/// including from several threads at once.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Project one input to the horizon
    ///
    /// Input, horizon and rates are all checked before the first step runs.
    /// A balance that overflows to infinity aborts the run with
    /// `BalanceOverflow`. On success the series holds `total_months + 1`
    /// rows starting at the start date.
    pub fn project(&self, input: &ProjectionInput) -> Result<ProjectionResult, ProjectionError> {
        input.validate()?;
        let total_months = input.total_months()?;
        let rates = MonthlyRates::from_annual(
            input.annual_return,
            input.annual_tax,
            input.annual_inflation,
        )?;
        let dates = (0..=total_months)
            .map(|month| {
                month_offset(input.start_date, month).ok_or(ProjectionError::InvalidHorizon {
                    start: input.start_date,
                    end: input.end_date,
                    months: i64::from(total_months),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Projecting {} months from {}: net return {:.6}/mo, inflation {:.6}/mo",
            total_months, input.start_date, rates.net_return_rate, rates.inflation_rate
        );

        let schedule = WithdrawalSchedule::from_input(input, &rates);
        let growth = rates.growth_factor();
        let mut state = ProjectionState::new(input.initial_wealth);

        let mut rows = Vec::with_capacity(dates.len());
        rows.push(ProjectionRow::opening(dates[0], input.initial_wealth));

        for &date in &dates[1..] {
            let month = state.month + 1;
            let withdrawal = schedule.amount(month);

            let floored = state.advance(growth, withdrawal);
            if floored && state.depletion_month == Some(month) {
                info!("Balance depleted in month {} ({})", month, date);
            }

            let balance = state.balance_with_withdrawal;
            let deviation = balance
                * self
                    .config
                    .volatility_scaling
                    .band_fraction(input.annual_volatility, month);
            let band_upper = balance + deviation;

            // inf * 0.0 is NaN, so a zero band cannot mask an overflow
            if !(state.balance_no_withdrawal.is_finite() && band_upper.is_finite()) {
                return Err(ProjectionError::BalanceOverflow { month });
            }

            rows.push(ProjectionRow {
                month_index: month,
                date,
                withdrawal,
                balance_no_withdrawal: state.balance_no_withdrawal,
                balance_with_withdrawal: balance,
                band_upper,
                band_lower: (balance - deviation).max(0.0),
            });
        }

        let series = ProjectionSeries::new(rows);
        let summary = ProjectionSummary::aggregate(
            &series,
            &schedule,
            &rates,
            total_months,
            state.depletion_month,
        );

        Ok(ProjectionResult {
            total_months,
            rates,
            series,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::NaiveDate;
    use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// 12% return, 4.5% inflation, 15% tax, 10% volatility, 5k indexed
    fn sample_input() -> ProjectionInput {
        ProjectionInput {
            initial_wealth: 1_000_000.0,
            start_date: date(2025, 1, 1),
            end_date: date(2026, 1, 1),
            annual_return: 0.12,
            annual_inflation: 0.045,
            annual_tax: 0.15,
            annual_volatility: 0.10,
            monthly_withdrawal: 5_000.0,
            index_withdrawal_to_inflation: true,
        }
    }

    fn project(input: &ProjectionInput) -> ProjectionResult {
        ProjectionEngine::default().project(input).expect("projection failed")
    }

    #[test]
    fn test_reference_first_month() {
        let result = project(&sample_input());
        assert_eq!(result.total_months, 12);
        assert_eq!(result.series.len(), 13);

        assert_abs_diff_eq!(result.rates.net_return_rate, 0.008126737, epsilon = 1e-8);
        assert_abs_diff_eq!(result.rates.inflation_rate, 0.003674809, epsilon = 1e-8);

        let m1 = result.series.rows()[1];
        let expected = 1_000_000.0 * (1.0 + result.rates.net_return_rate)
            - 5_000.0 * (1.0 + result.rates.inflation_rate);
        assert_relative_eq!(m1.balance_with_withdrawal, expected, max_relative = 1e-12);
        assert_abs_diff_eq!(m1.balance_with_withdrawal, 1_003_108.36, epsilon = 0.01);
        assert_abs_diff_eq!(m1.withdrawal, 5_018.374, epsilon = 0.001);

        // Band half-width: balance * 10% * sqrt(1/12)
        let deviation = m1.balance_with_withdrawal * 0.10 * (1.0_f64 / 12.0).sqrt();
        assert_relative_eq!(m1.band_upper, m1.balance_with_withdrawal + deviation, max_relative = 1e-12);
        assert_relative_eq!(m1.band_lower, m1.balance_with_withdrawal - deviation, max_relative = 1e-12);
        assert_eq!(m1.date, date(2025, 2, 1));
    }

    #[test]
    fn test_band_after_one_year() {
        let result = project(&sample_input());
        let m12 = result.series.last().unwrap();
        // sqrt(12 / 12) = 1: band is exactly +-10% of the balance
        assert_relative_eq!(m12.band_upper, m12.balance_with_withdrawal * 1.1, max_relative = 1e-12);
        assert_relative_eq!(m12.band_lower, m12.balance_with_withdrawal * 0.9, max_relative = 1e-12);
    }

    #[test]
    fn test_no_withdrawal_balance_compounds_annual_net_rate() {
        let result = project(&sample_input());
        let m12 = result.series.last().unwrap();
        // Twelve months at the equivalent monthly rate give exactly 10.2%
        assert_relative_eq!(m12.balance_no_withdrawal, 1_102_000.0, max_relative = 1e-10);
    }

    #[test]
    fn test_summary_matches_series() {
        let result = project(&sample_input());
        let summary = result.summary;

        assert_eq!(summary.final_balance, result.series.last().unwrap().balance_with_withdrawal);
        let applied: f64 = result.series.iter().map(|r| r.withdrawal).sum();
        assert_relative_eq!(summary.total_withdrawn, applied, max_relative = 1e-12);
        assert_abs_diff_eq!(summary.effective_monthly_net_rate, 0.8126737, epsilon = 1e-6);
        assert_eq!(summary.depletion_month, None);
    }

    #[test]
    fn test_contribution_from_zero() {
        let input = ProjectionInput {
            initial_wealth: 0.0,
            end_date: date(2025, 2, 1),
            annual_return: 0.0,
            annual_inflation: 0.0,
            annual_tax: 0.0,
            annual_volatility: 0.0,
            monthly_withdrawal: -5_000.0,
            index_withdrawal_to_inflation: false,
            ..sample_input()
        };
        let result = project(&input);

        assert_eq!(result.series.len(), 2);
        let m1 = result.series.rows()[1];
        assert_eq!(m1.balance_with_withdrawal, 5_000.0);
        assert_eq!(m1.band_upper, 5_000.0);
        assert_eq!(m1.band_lower, 5_000.0);
        assert_eq!(m1.balance_no_withdrawal, 0.0);
        assert_eq!(result.summary.total_withdrawn, -5_000.0);
    }

    #[test]
    fn test_invalid_horizon_produces_no_series() {
        let input = ProjectionInput {
            end_date: sample_input().start_date,
            ..sample_input()
        };
        let err = ProjectionEngine::default().project(&input).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidHorizon { months: 0, .. }));

        let backwards = ProjectionInput {
            end_date: date(2024, 1, 1),
            ..sample_input()
        };
        assert!(matches!(
            ProjectionEngine::default().project(&backwards),
            Err(ProjectionError::InvalidHorizon { months: -12, .. })
        ));
    }

    #[test]
    fn test_invalid_rate_domain() {
        let input = ProjectionInput {
            annual_return: -0.8,
            annual_tax: -0.5,
            ..sample_input()
        };
        // -0.8 * 1.5 = -1.2: growth factor -0.2
        assert!(matches!(
            ProjectionEngine::default().project(&input),
            Err(ProjectionError::InvalidRateDomain { rate: "net return", .. })
        ));
    }

    #[test]
    fn test_overflowing_balance_is_rejected() {
        let input = ProjectionInput {
            initial_wealth: 1e308,
            end_date: date(2035, 1, 1),
            annual_return: 0.12,
            annual_volatility: 0.0,
            ..sample_input()
        };
        for scaling in [VolatilityScaling::SquareRootOfTime, VolatilityScaling::Flat] {
            let engine = ProjectionEngine::new(ProjectionConfig {
                volatility_scaling: scaling,
            });
            match engine.project(&input) {
                Err(ProjectionError::BalanceOverflow { month }) => assert!(month > 1 && month < 120),
                other => panic!("expected overflow, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_depletion_floors_at_zero_and_stays() {
        let input = ProjectionInput {
            initial_wealth: 10_000.0,
            end_date: date(2027, 1, 1),
            annual_return: 0.05,
            annual_volatility: 0.2,
            monthly_withdrawal: 2_000.0,
            index_withdrawal_to_inflation: false,
            ..sample_input()
        };
        let result = project(&input);

        let depleted_at = result.summary.depletion_month.expect("balance should deplete");
        assert!(depleted_at <= 6);

        for row in result.series.iter().skip(depleted_at as usize) {
            assert_eq!(row.balance_with_withdrawal, 0.0);
            assert_eq!(row.band_upper, 0.0);
            assert_eq!(row.band_lower, 0.0);
        }
        for row in result.series.iter().take(depleted_at as usize) {
            assert!(row.balance_with_withdrawal > 0.0);
        }
        assert_eq!(result.summary.final_balance, 0.0);
        // Scheduled withdrawals keep counting after depletion
        assert_relative_eq!(result.summary.total_withdrawn, 24.0 * 2_000.0);
        // The untouched balance keeps compounding
        assert!(result.series.last().unwrap().balance_no_withdrawal > 10_000.0);
    }

    #[test]
    fn test_unindexed_withdrawal_is_constant() {
        let input = ProjectionInput {
            index_withdrawal_to_inflation: false,
            ..sample_input()
        };
        let result = project(&input);
        assert!(result.series.iter().skip(1).all(|r| r.withdrawal == 5_000.0));
        assert_relative_eq!(result.summary.total_withdrawn, 60_000.0);
    }

    #[test]
    fn test_indexed_withdrawal_escalates() {
        let result = project(&sample_input());
        let rows = result.series.rows();
        for pair in rows[1..].windows(2) {
            assert!(pair[1].withdrawal > pair[0].withdrawal);
        }
        // Month 12 withdrawal carries a full year of inflation
        assert_relative_eq!(rows[12].withdrawal, 5_000.0 * 1.045, max_relative = 1e-10);
    }

    #[test]
    fn test_flat_volatility_scaling() {
        let engine = ProjectionEngine::new(ProjectionConfig {
            volatility_scaling: VolatilityScaling::Flat,
        });
        let result = engine.project(&sample_input()).unwrap();
        let fraction = 0.10 / 12.0_f64.sqrt();

        for row in result.series.iter().skip(1) {
            let b = row.balance_with_withdrawal;
            assert_relative_eq!(row.band_upper, b * (1.0 + fraction), max_relative = 1e-12);
        }
        // Opening row stays at initial wealth regardless of scaling
        let opening = result.series.first().unwrap();
        assert_eq!(opening.band_upper, 1_000_000.0);
    }

    #[test]
    fn test_negative_volatility_uses_magnitude() {
        let positive = project(&sample_input());
        let negative = project(&ProjectionInput {
            annual_volatility: -0.10,
            ..sample_input()
        });
        assert_eq!(positive.series, negative.series);
    }

    #[test]
    fn test_negative_initial_wealth_rejected() {
        let input = ProjectionInput {
            initial_wealth: -10.0,
            ..sample_input()
        };
        assert!(matches!(
            ProjectionEngine::default().project(&input),
            Err(ProjectionError::InvalidInput { field: "initial_wealth", .. })
        ));
    }

    #[test]
    fn test_dates_clamp_from_month_end() {
        let input = ProjectionInput {
            start_date: date(2024, 1, 31),
            end_date: date(2024, 4, 1),
            ..sample_input()
        };
        let result = project(&input);
        assert_eq!(
            result.series.dates(),
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31), date(2024, 4, 30)]
        );
    }

    #[test]
    fn test_volatility_scaling_fractions() {
        let sqrt_time = VolatilityScaling::SquareRootOfTime;
        assert_eq!(sqrt_time.band_fraction(0.10, 0), 0.0);
        assert_relative_eq!(sqrt_time.band_fraction(0.10, 12), 0.10);
        assert_relative_eq!(sqrt_time.band_fraction(0.10, 48), 0.20);
        assert_relative_eq!(VolatilityScaling::Flat.band_fraction(0.10, 48), 0.10 / 12.0_f64.sqrt());
    }

    #[test]
    fn test_config_deserialize() {
        let config: ProjectionConfig = serde_json::from_str(r#"{"volatility_scaling":"flat"}"#).unwrap();
        assert_eq!(config.volatility_scaling, VolatilityScaling::Flat);
        let config: ProjectionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.volatility_scaling, VolatilityScaling::SquareRootOfTime);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_series_invariants(
            initial in 0u32..2_000_000,
            months in 1u32..480,
            return_bp in -3000i32..3000,
            tax_bp in 0u32..5000,
            inflation_bp in -500i32..1500,
            vol_bp in 0u32..6000,
            withdrawal in -20_000i32..20_000,
            indexed in any::<bool>(),
            flat in any::<bool>(),
        ) {
            let start = date(2024, 1, 31);
            let input = ProjectionInput {
                initial_wealth: initial as f64,
                start_date: start,
                end_date: month_offset(start, months).unwrap(),
                annual_return: return_bp as f64 / 10_000.0,
                annual_inflation: inflation_bp as f64 / 10_000.0,
                annual_tax: tax_bp as f64 / 10_000.0,
                annual_volatility: vol_bp as f64 / 10_000.0,
                monthly_withdrawal: withdrawal as f64,
                index_withdrawal_to_inflation: indexed,
            };
            let scaling = if flat { VolatilityScaling::Flat } else { VolatilityScaling::SquareRootOfTime };
            let engine = ProjectionEngine::new(ProjectionConfig { volatility_scaling: scaling });
            let result = engine.project(&input).unwrap();

            prop_assert_eq!(result.total_months, months);
            prop_assert_eq!(result.series.len(), months as usize + 1);

            let opening = result.series.first().unwrap();
            prop_assert_eq!(opening.balance_no_withdrawal, input.initial_wealth);
            prop_assert_eq!(opening.balance_with_withdrawal, input.initial_wealth);
            prop_assert_eq!(opening.band_upper, input.initial_wealth);
            prop_assert_eq!(opening.band_lower, input.initial_wealth);

            for (i, row) in result.series.iter().enumerate() {
                prop_assert_eq!(row.month_index as usize, i);
                prop_assert_eq!(Some(row.date), month_offset(start, i as u32));
                prop_assert!(row.band_lower <= row.balance_with_withdrawal);
                prop_assert!(row.balance_with_withdrawal <= row.band_upper);
                prop_assert!(row.balance_with_withdrawal >= 0.0);
                prop_assert!(row.band_lower >= 0.0);
                prop_assert!(row.balance_no_withdrawal >= 0.0);
            }

            prop_assert_eq!(
                result.summary.final_balance,
                result.series.last().unwrap().balance_with_withdrawal
            );

            // Same input, same bits
            let again = engine.project(&input).unwrap();
            prop_assert_eq!(&again, &result);
        }

        #[test]
        fn prop_zero_volatility_collapses_band(
            initial in 0u32..1_000_000,
            months in 1u32..240,
            withdrawal in -10_000i32..10_000,
        ) {
            let input = ProjectionInput {
                initial_wealth: initial as f64,
                end_date: month_offset(date(2025, 1, 1), months).unwrap(),
                annual_volatility: 0.0,
                monthly_withdrawal: withdrawal as f64,
                ..sample_input()
            };
            let result = ProjectionEngine::default().project(&input).unwrap();
            for row in &result.series {
                prop_assert_eq!(row.band_upper, row.balance_with_withdrawal);
                prop_assert_eq!(row.band_lower, row.balance_with_withdrawal);
            }
        }

        #[test]
        fn prop_zero_withdrawal_tracks_untouched_balance(
            initial in 0u32..5_000_000,
            months in 1u32..360,
            return_bp in -2000i32..4000,
            indexed in any::<bool>(),
        ) {
            let input = ProjectionInput {
                initial_wealth: initial as f64,
                end_date: month_offset(date(2025, 1, 1), months).unwrap(),
                annual_return: return_bp as f64 / 10_000.0,
                monthly_withdrawal: 0.0,
                index_withdrawal_to_inflation: indexed,
                ..sample_input()
            };
            let result = ProjectionEngine::default().project(&input).unwrap();
            for row in &result.series {
                prop_assert_eq!(row.balance_with_withdrawal, row.balance_no_withdrawal);
            }
            prop_assert_eq!(result.summary.total_withdrawn, 0.0);
        }
    }
}
