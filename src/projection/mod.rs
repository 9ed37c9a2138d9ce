//! Projection engine for wealth trajectories under withdrawals and volatility

mod input;
mod state;
mod withdrawals;
mod engine;
mod cashflows;
mod summary;

pub use input::ProjectionInput;
pub use state::ProjectionState;
pub use withdrawals::WithdrawalSchedule;
pub use engine::{ProjectionEngine, ProjectionConfig, VolatilityScaling};
pub use cashflows::{ProjectionRow, ProjectionSeries, ProjectionResult};
pub use summary::ProjectionSummary;
