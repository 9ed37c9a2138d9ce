//! Rate normalizer: annual assumptions to equivalent monthly compounding rates

use serde::Serialize;

use super::MONTHS_PER_YEAR;
use crate::error::ProjectionError;

/// Monthly compounding rates derived once per run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyRates {
    /// After-tax monthly return
    pub net_return_rate: f64,
    /// Monthly inflation, used to index withdrawals
    pub inflation_rate: f64,
}

impl MonthlyRates {
    /// Convert annual return, tax and inflation into monthly equivalents
    ///
    /// Tax is charged on the return, so the net annual rate is
    /// `annual_return * (1 - annual_tax)`. Twelve monthly steps at the result
    /// reproduce each annual rate exactly.
    ///
    /// # Errors
    /// `InvalidRateDomain` if either annual growth factor `1 + r` is not
    /// strictly positive (a fractional power of it would be undefined).
    pub fn from_annual(
        annual_return: f64,
        annual_tax: f64,
        annual_inflation: f64,
    ) -> Result<Self, ProjectionError> {
        let net_annual = net_annual_return(annual_return, annual_tax);
        Ok(Self {
            net_return_rate: equivalent_monthly_rate(net_annual, "net return")?,
            inflation_rate: equivalent_monthly_rate(annual_inflation, "inflation")?,
        })
    }

    /// Net monthly return restated as a percentage (0.81 for 0.81%/month)
    pub fn net_return_pct(&self) -> f64 {
        self.net_return_rate * 100.0
    }

    /// Growth factor applied to a balance over one month
    pub fn growth_factor(&self) -> f64 {
        1.0 + self.net_return_rate
    }
}

/// After-tax annual return
pub fn net_annual_return(annual_return: f64, annual_tax: f64) -> f64 {
    annual_return * (1.0 - annual_tax)
}

/// Monthly rate that compounds to `annual_rate` over twelve months
///
/// `label` names the rate in the error raised for a non-positive growth
/// factor.
pub fn equivalent_monthly_rate(annual_rate: f64, label: &'static str) -> Result<f64, ProjectionError> {
    let base = 1.0 + annual_rate;
    if !base.is_finite() || base <= 0.0 {
        return Err(ProjectionError::InvalidRateDomain { rate: label, base });
    }
    Ok(base.powf(1.0 / MONTHS_PER_YEAR as f64) - 1.0)
}
