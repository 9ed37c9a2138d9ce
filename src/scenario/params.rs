//! Scenario parameters with front-end defaults

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    DEFAULT_ANNUAL_INFLATION, DEFAULT_ANNUAL_RETURN, DEFAULT_ANNUAL_TAX,
    DEFAULT_ANNUAL_VOLATILITY, DEFAULT_HORIZON_YEARS, DEFAULT_INITIAL_WEALTH,
    DEFAULT_MONTHLY_WITHDRAWAL,
};
use crate::assumptions::{month_offset, MONTHS_PER_YEAR};
use crate::projection::ProjectionInput;

/// Parameters for one scenario, as read from CSV or JSON
///
/// Every field is optional on the wire. Rates are fractions (0.12 = 12%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// Label used in batch output; defaults to `scenario_<n>`
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default = "default_initial_wealth")]
    pub initial_wealth: f64,

    /// Defaults to the run date
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// Defaults to `start_date + horizon_years`
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    /// Only used when `end_date` is absent
    #[serde(default = "default_horizon_years")]
    pub horizon_years: u32,

    #[serde(default = "default_annual_return")]
    pub annual_return: f64,

    #[serde(default = "default_annual_inflation")]
    pub annual_inflation: f64,

    #[serde(default = "default_annual_tax")]
    pub annual_tax: f64,

    #[serde(default = "default_annual_volatility")]
    pub annual_volatility: f64,

    /// Negative for monthly contributions
    #[serde(default = "default_monthly_withdrawal")]
    pub monthly_withdrawal: f64,

    #[serde(default = "default_true")]
    pub index_withdrawal_to_inflation: bool,
}

fn default_initial_wealth() -> f64 { DEFAULT_INITIAL_WEALTH }
fn default_horizon_years() -> u32 { DEFAULT_HORIZON_YEARS }
fn default_annual_return() -> f64 { DEFAULT_ANNUAL_RETURN }
fn default_annual_inflation() -> f64 { DEFAULT_ANNUAL_INFLATION }
fn default_annual_tax() -> f64 { DEFAULT_ANNUAL_TAX }
fn default_annual_volatility() -> f64 { DEFAULT_ANNUAL_VOLATILITY }
fn default_monthly_withdrawal() -> f64 { DEFAULT_MONTHLY_WITHDRAWAL }
fn default_true() -> bool { true }

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            name: None,
            initial_wealth: DEFAULT_INITIAL_WEALTH,
            start_date: None,
            end_date: None,
            horizon_years: DEFAULT_HORIZON_YEARS,
            annual_return: DEFAULT_ANNUAL_RETURN,
            annual_inflation: DEFAULT_ANNUAL_INFLATION,
            annual_tax: DEFAULT_ANNUAL_TAX,
            annual_volatility: DEFAULT_ANNUAL_VOLATILITY,
            monthly_withdrawal: DEFAULT_MONTHLY_WITHDRAWAL,
            index_withdrawal_to_inflation: true,
        }
    }
}

impl ScenarioParams {
    /// Resolve defaults into a complete engine input
    ///
    /// `today` stands in for a missing start date. If the default end date
    /// would overflow the calendar it collapses onto the start date, which
    /// the engine then rejects as an invalid horizon.
    pub fn to_input(&self, today: NaiveDate) -> ProjectionInput {
        let start_date = self.start_date.unwrap_or(today);
        let end_date = self.end_date.unwrap_or_else(|| {
            let months = self.horizon_years.saturating_mul(MONTHS_PER_YEAR);
            month_offset(start_date, months).unwrap_or(start_date)
        });

        ProjectionInput {
            initial_wealth: self.initial_wealth,
            start_date,
            end_date,
            annual_return: self.annual_return,
            annual_inflation: self.annual_inflation,
            annual_tax: self.annual_tax,
            annual_volatility: self.annual_volatility,
            monthly_withdrawal: self.monthly_withdrawal,
            index_withdrawal_to_inflation: self.index_withdrawal_to_inflation,
        }
    }

    /// Build a named scenario; `index` is 0-based and only used for unnamed rows
    pub fn into_scenario(self, index: usize, today: NaiveDate) -> Scenario {
        let input = self.to_input(today);
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("scenario_{}", index + 1));
        Scenario { name, input }
    }
}

/// A fully resolved, named projection input
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub input: ProjectionInput,
}
