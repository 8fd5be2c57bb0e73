mod coverage;
mod runner;
mod trial;
mod types;

pub use coverage::allocate_week;
pub use runner::{
    run_scenario, run_trials, trial_rng, RunConfig, DEFAULT_CYCLE_WEEKS, DEFAULT_ITERATIONS,
};
pub use trial::simulate;
pub use types::{Bucket, EventOutcome, HorizonCounts, ShiftOutcome, SimError, TrialResult};

use crate::model::{Scenario, ScenarioSet};
use crate::summary::ScenarioSummary;

/// Simulator : applique une configuration d'essais à des scénarios.
#[derive(Debug, Default, Clone)]
pub struct Simulator {
    config: RunConfig,
}

impl Simulator {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn run_trials(&self, scenario: &Scenario) -> Result<Vec<TrialResult>, SimError> {
        runner::run_trials(scenario, &self.config)
    }

    /// Essais + agrégation pour un scénario.
    pub fn run(&self, scenario: &Scenario) -> Result<ScenarioSummary, SimError> {
        runner::run_scenario(scenario, &self.config)
    }

    /// Tous les scénarios de l'ensemble, ou seulement `only`.
    pub fn run_all(
        &self,
        set: &ScenarioSet,
        only: Option<&str>,
    ) -> Result<Vec<ScenarioSummary>, SimError> {
        match only {
            Some(name) => {
                let scenario = set
                    .find(name)
                    .ok_or_else(|| SimError::UnknownScenario(name.to_string()))?;
                Ok(vec![self.run(scenario)?])
            }
            None => set.scenarios.iter().map(|s| self.run(s)).collect(),
        }
    }
}
