//! Error types for projection runs and scenario loading

use chrono::NaiveDate;
use thiserror::Error;

/// Reasons a projection run is refused.
///
/// Input, horizon and rate errors are raised before the first recurrence
/// step. `BalanceOverflow` stops the run mid-way. Either way a failed run
/// never yields a partial series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// End date does not fall in a later calendar month than the start date
    #[error("end date {end} must be at least one calendar month after start date {start} (got {months} months)")]
    InvalidHorizon {
        start: NaiveDate,
        end: NaiveDate,
        months: i64,
    },

    /// `1 + rate` is non-positive, so no equivalent monthly rate exists
    #[error("{rate} rate gives a non-positive annual growth factor ({base}); no equivalent monthly rate exists")]
    InvalidRateDomain { rate: &'static str, base: f64 },

    /// A scalar input is NaN, infinite, or out of its allowed range
    #[error("invalid value for {field}: {value}")]
    InvalidInput { field: &'static str, value: f64 },

    /// A balance or band left the finite range of `f64`
    #[error("balance overflowed in month {month}")]
    BalanceOverflow { month: u32 },
}

/// Errors raised while loading scenario files
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed scenario CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("scenario row {row} ({name}): {source}")]
    Scenario {
        row: usize,
        name: String,
        #[source]
        source: csv::Error,
    },
}
