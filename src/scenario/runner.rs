//! Parallel projection of independent scenarios

use log::{info, warn};
use rayon::prelude::*;

use super::Scenario;
use crate::error::ProjectionError;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};

/// Result of projecting one scenario in a batch
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub name: String,
    pub result: Result<ProjectionResult, ProjectionError>,
}

impl ScenarioOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs many scenarios through one engine
///
/// Scenarios share nothing mutable, so they are projected in parallel. Each
/// recurrence is still strictly sequential within its own run.
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    /// Project every scenario; outcomes keep the input order
    ///
    /// A scenario that fails validation does not affect the others.
    pub fn run(&self, scenarios: &[Scenario]) -> Vec<ScenarioOutcome> {
        let outcomes: Vec<ScenarioOutcome> = scenarios
            .par_iter()
            .map(|scenario| ScenarioOutcome {
                name: scenario.name.clone(),
                result: self.engine.project(&scenario.input),
            })
            .collect();

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                warn!("Scenario '{}' rejected: {}", outcome.name, e);
            }
        }
        info!(
            "Projected {} scenarios ({} failed)",
            outcomes.len(),
            failed
        );

        outcomes
    }
}
