//! Wealth Projection - deterministic portfolio projection under withdrawals
//!
//! This library provides:
//! - Conversion of annual return, tax and inflation assumptions to equivalent monthly rates
//! - Month-by-month projection with and without withdrawals, floored at zero
//! - Square-root-of-time volatility bands around the withdrawal-adjusted balance
//! - Summary metrics (final balance, total withdrawn, net monthly rate)
//! - Named scenarios with defaults, CSV loading and parallel batch runs

pub mod error;
pub mod assumptions;
pub mod projection;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use error::{LoadError, ProjectionError};
pub use assumptions::MonthlyRates;
pub use projection::{
    ProjectionConfig, ProjectionEngine, ProjectionInput, ProjectionResult, ProjectionSeries,
    ProjectionSummary, VolatilityScaling,
};
pub use scenario::{Scenario, ScenarioParams, ScenarioRunner};
