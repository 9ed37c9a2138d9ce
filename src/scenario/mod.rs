//! Scenario parameter sets and batch projection
//!
//! A scenario is a named, partially specified input. Missing fields take the
//! defaults below, which belong to the front ends rather than the engine.

mod params;
pub mod loader;
mod runner;

pub use params::{Scenario, ScenarioParams};
pub use loader::{load_scenarios, load_scenarios_from_reader};
pub use runner::{ScenarioOutcome, ScenarioRunner};

// ============================================================================
// Default Scenario Parameters
// ============================================================================
// Front-end defaults for a retirement drawdown: a 1M portfolio drawing 5k a
// month, indexed to inflation, over ten years.

/// Default starting balance
pub const DEFAULT_INITIAL_WEALTH: f64 = 1_000_000.0;

/// Default expected annual return (12%)
pub const DEFAULT_ANNUAL_RETURN: f64 = 0.12;

/// Default annual inflation (4.5%)
pub const DEFAULT_ANNUAL_INFLATION: f64 = 0.045;

/// Default tax on returns (15%)
pub const DEFAULT_ANNUAL_TAX: f64 = 0.15;

/// Default annual volatility (10%)
pub const DEFAULT_ANNUAL_VOLATILITY: f64 = 0.10;

/// Default monthly withdrawal
pub const DEFAULT_MONTHLY_WITHDRAWAL: f64 = 5_000.0;

/// Default horizon when no end date is given
pub const DEFAULT_HORIZON_YEARS: u32 = 10;
