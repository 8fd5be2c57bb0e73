use super::{simulate, SimError, TrialResult};
use crate::model::Scenario;
use crate::summary::{summarize_scenario, ScenarioSummary};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::debug;

pub const DEFAULT_ITERATIONS: usize = 1000;
pub const DEFAULT_CYCLE_WEEKS: u32 = 52;

/// Paramètres d'une campagne d'essais.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Nombre d'essais par scénario.
    pub iterations: usize,
    /// Longueur d'un cycle, en semaines.
    pub cycle_weeks: u32,
    /// Graine de base : l'essai `i` utilise `base_seed + i`. Sans graine,
    /// chaque essai tire la sienne de l'entropie du système.
    pub base_seed: Option<u64>,
    pub parallel: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            cycle_weeks: DEFAULT_CYCLE_WEEKS,
            base_seed: None,
            parallel: true,
        }
    }
}

/// Générateur privé de l'essai `index`.
pub fn trial_rng(base_seed: Option<u64>, index: usize) -> ChaCha8Rng {
    match base_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn run_one(
    scenario: &Scenario,
    config: &RunConfig,
    index: usize,
) -> Result<TrialResult, SimError> {
    let mut rng = trial_rng(config.base_seed, index);
    simulate(config.cycle_weeks, scenario, &mut rng)
}

/// Lance `config.iterations` essais indépendants, dans l'ordre des index.
pub fn run_trials(
    scenario: &Scenario,
    config: &RunConfig,
) -> Result<Vec<TrialResult>, SimError> {
    if config.iterations == 0 {
        return Err(SimError::NoTrials);
    }
    debug!(
        scenario = scenario.name(),
        iterations = config.iterations,
        cycle_weeks = config.cycle_weeks,
        parallel = config.parallel,
        "running trials"
    );
    if config.parallel {
        (0..config.iterations)
            .into_par_iter()
            .map(|i| run_one(scenario, config, i))
            .collect()
    } else {
        (0..config.iterations)
            .map(|i| run_one(scenario, config, i))
            .collect()
    }
}

/// Essais puis agrégation d'un scénario.
pub fn run_scenario(
    scenario: &Scenario,
    config: &RunConfig,
) -> Result<ScenarioSummary, SimError> {
    let results = run_trials(scenario, config)?;
    summarize_scenario(scenario, config.cycle_weeks, &results)
}
