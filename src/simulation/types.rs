use serde::Serialize;
use thiserror::Error;

/// Délai de prévenance d'une occurrence, plus le total du cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Weeks0,
    Weeks2,
    Weeks4,
    Weeks12,
    Total,
}

impl Bucket {
    /// Les quatre fenêtres tirées chaque semaine, dans l'ordre des taux.
    pub const HORIZONS: [Bucket; 4] =
        [Bucket::Weeks0, Bucket::Weeks2, Bucket::Weeks4, Bucket::Weeks12];
    /// Ordre d'affichage : total d'abord.
    pub const ALL: [Bucket; 5] = [
        Bucket::Total,
        Bucket::Weeks0,
        Bucket::Weeks2,
        Bucket::Weeks4,
        Bucket::Weeks12,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Weeks0 => "Weeks 0 to 2",
            Bucket::Weeks2 => "Weeks 2 to 4",
            Bucket::Weeks4 => "Weeks 4 to 12",
            Bucket::Weeks12 => "Weeks 12+",
            Bucket::Total => "Total",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Bucket::Weeks0 => "weeks_0",
            Bucket::Weeks2 => "weeks_2",
            Bucket::Weeks4 => "weeks_4",
            Bucket::Weeks12 => "weeks_12",
            Bucket::Total => "total",
        }
    }
}

/// Quatre fenêtres + total.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HorizonCounts<T> {
    pub weeks_0: T,
    pub weeks_2: T,
    pub weeks_4: T,
    pub weeks_12: T,
    pub total: T,
}

impl<T> HorizonCounts<T> {
    pub fn try_from_fn<E>(mut f: impl FnMut(Bucket) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            weeks_0: f(Bucket::Weeks0)?,
            weeks_2: f(Bucket::Weeks2)?,
            weeks_4: f(Bucket::Weeks4)?,
            weeks_12: f(Bucket::Weeks12)?,
            total: f(Bucket::Total)?,
        })
    }

    pub fn get(&self, bucket: Bucket) -> &T {
        match bucket {
            Bucket::Weeks0 => &self.weeks_0,
            Bucket::Weeks2 => &self.weeks_2,
            Bucket::Weeks4 => &self.weeks_4,
            Bucket::Weeks12 => &self.weeks_12,
            Bucket::Total => &self.total,
        }
    }

    pub fn get_mut(&mut self, bucket: Bucket) -> &mut T {
        match bucket {
            Bucket::Weeks0 => &mut self.weeks_0,
            Bucket::Weeks2 => &mut self.weeks_2,
            Bucket::Weeks4 => &mut self.weeks_4,
            Bucket::Weeks12 => &mut self.weeks_12,
            Bucket::Total => &mut self.total,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> HorizonCounts<U> {
        HorizonCounts {
            weeks_0: f(&self.weeks_0),
            weeks_2: f(&self.weeks_2),
            weeks_4: f(&self.weeks_4),
            weeks_12: f(&self.weeks_12),
            total: f(&self.total),
        }
    }
}

/// Occurrences cumulées d'un évènement sur un cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventOutcome {
    pub name: String,
    pub counts: HorizonCounts<u64>,
}

/// Créneaux non couverts cumulés d'un groupe sur un cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftOutcome {
    pub name: String,
    pub uncovered: f64,
}

/// Compteurs bruts d'un essai (un cycle simulé).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialResult {
    /// Dans l'ordre de déclaration des évènements.
    pub events: Vec<EventOutcome>,
    /// Dans l'ordre de service des groupes.
    pub uncovered: Vec<ShiftOutcome>,
    pub excess_capacity: f64,
    pub changes: HorizonCounts<f64>,
}

impl TrialResult {
    pub fn event(&self, name: &str) -> Option<&EventOutcome> {
        self.events.iter().find(|e| e.name == name)
    }

    pub fn shift(&self, name: &str) -> Option<&ShiftOutcome> {
        self.uncovered.iter().find(|s| s.name == name)
    }

    /// Somme, fenêtre par fenêtre, des occurrences de tous les évènements.
    pub fn all_events(&self) -> HorizonCounts<u64> {
        self.events.iter().fold(HorizonCounts::default(), |mut acc, e| {
            for bucket in Bucket::ALL {
                *acc.get_mut(bucket) += *e.counts.get(bucket);
            }
            acc
        })
    }

    pub fn total_uncovered(&self) -> f64 {
        self.uncovered.iter().map(|s| s.uncovered).sum()
    }
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("shift capacity must be strictly positive (got {0})")]
    InvalidCapacity(f64),
    #[error("invalid rate {rate} for event {event}")]
    InvalidRate { event: String, rate: f64 },
    #[error("cannot summarize an empty series")]
    EmptySeries,
    #[error("at least one trial is required per scenario")]
    NoTrials,
    #[error("trial result does not match scenario: missing {0}")]
    ShapeMismatch(String),
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(err: &SimError) -> &'static str {
        match err {
            SimError::InvalidCapacity(_) => "capacity",
            SimError::InvalidRate { .. } => "rate",
            SimError::EmptySeries => "series",
            SimError::NoTrials => "trial",
            SimError::ShapeMismatch(_) => "does not match",
            SimError::UnknownScenario(_) => "scenario",
        }
    }

    #[test]
    fn every_error_names_its_cause() {
        let errors = [
            SimError::InvalidCapacity(0.0),
            SimError::InvalidRate { event: "Sick".into(), rate: 1.5 },
            SimError::EmptySeries,
            SimError::NoTrials,
            SimError::ShapeMismatch("ICU".into()),
            SimError::UnknownScenario("Nope".into()),
        ];
        for err in &errors {
            let msg = err.to_string();
            assert!(msg.contains(describe(err)), "{msg}");
        }
    }
}
