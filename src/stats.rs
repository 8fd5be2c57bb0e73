use crate::simulation::SimError;
use serde::Serialize;
use std::fmt;

/// Bornes de l'intervalle empirique à 95 %.
pub const CI_LOWER_PERCENTILE: f64 = 2.5;
pub const CI_UPPER_PERCENTILE: f64 = 97.5;

/// Moyenne et intervalle de confiance empirique d'une série d'essais.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl Stats {
    /// Résume une série (une valeur par essai).
    ///
    /// `ci_lower` / `ci_upper` sont les percentiles 2,5 et 97,5 par
    /// interpolation linéaire entre rangs (`rang = p × (n − 1)`).
    pub fn summarize(values: &[f64]) -> Result<Self, SimError> {
        if values.is_empty() {
            return Err(SimError::EmptySeries);
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Ok(Self {
            mean,
            ci_lower: percentile(&sorted, CI_LOWER_PERCENTILE),
            ci_upper: percentile(&sorted, CI_UPPER_PERCENTILE),
        })
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mean = {:.2} (95% CI {:.2}-{:.2})",
            self.mean, self.ci_lower, self.ci_upper
        )
    }
}

/// Percentile `p` (0–100) d'une série triée non vide.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let w = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * w
}
