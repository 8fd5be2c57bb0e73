use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Nombre de créneaux couverts par 1 FTE sur une semaine.
pub const SHIFTS_PER_FTE_WEEK: f64 = 5.0;

// écart toléré entre `total` et la somme des trois types (arrondis JSON)
const TOTAL_TOLERANCE: f64 = 1e-6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScenarioError {
    #[error("scenario name cannot be empty")]
    EmptyName,
    #[error("shift capacity must be strictly positive (got {0})")]
    InvalidCapacity(f64),
    #[error("invalid event {name}: {reason}")]
    InvalidEvent { name: String, reason: &'static str },
    #[error("invalid shift group {name}: {reason}")]
    InvalidShiftGroup { name: String, reason: &'static str },
    #[error("duplicate event name: {0}")]
    DuplicateEvent(String),
    #[error("duplicate shift group name: {0}")]
    DuplicateShiftGroup(String),
    #[error("{which} total {total} does not match regular + bece + casual ({sum})")]
    InconsistentTotal {
        which: &'static str,
        total: f64,
        sum: f64,
    },
}

/// Type d'évènement aléatoire qui consomme de la capacité (congés, maladie...).
///
/// Les taux sont des probabilités hebdomadaires par créneau, ventilées selon
/// le délai de prévenance : `rate_0` (0 à 2 semaines), `rate_2` (2 à 4),
/// `rate_4` (4 à 12) et `rate_12` (12 semaines et plus).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    /// Changements d'horaire par occurrence.
    pub changes: f64,
    /// Créneaux perdus par occurrence.
    pub losses: f64,
    #[serde(default)]
    pub rate_0: f64,
    #[serde(default)]
    pub rate_2: f64,
    #[serde(default)]
    pub rate_4: f64,
    #[serde(default)]
    pub rate_12: f64,
    /// Plafond d'occurrences sur un cycle ; `None` = illimité.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_max: Option<u64>,
}

impl Event {
    pub fn new<N: Into<String>>(name: N, changes: f64, losses: f64) -> Self {
        Self {
            name: name.into(),
            changes,
            losses,
            rate_0: 0.0,
            rate_2: 0.0,
            rate_4: 0.0,
            rate_12: 0.0,
            cycle_max: None,
        }
    }

    pub fn with_rates(mut self, rate_0: f64, rate_2: f64, rate_4: f64, rate_12: f64) -> Self {
        self.rate_0 = rate_0;
        self.rate_2 = rate_2;
        self.rate_4 = rate_4;
        self.rate_12 = rate_12;
        self
    }

    pub fn with_cycle_max(mut self, cycle_max: u64) -> Self {
        self.cycle_max = Some(cycle_max);
        self
    }

    pub fn rates(&self) -> [f64; 4] {
        [self.rate_0, self.rate_2, self.rate_4, self.rate_12]
    }

    pub fn rate_total(&self) -> f64 {
        self.rates().iter().sum()
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        let invalid = |reason| ScenarioError::InvalidEvent {
            name: self.name.clone(),
            reason,
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if !self.changes.is_finite() || self.changes < 0.0 {
            return Err(invalid("changes must be a finite, non-negative number"));
        }
        if !self.losses.is_finite() || self.losses < 0.0 {
            return Err(invalid("losses must be a finite, non-negative number"));
        }
        if self
            .rates()
            .iter()
            .any(|r| !r.is_finite() || !(0.0..=1.0).contains(r))
        {
            return Err(invalid("rates must be probabilities in [0, 1]"));
        }
        Ok(())
    }
}

fn default_priority() -> u32 {
    1
}

/// Groupe de créneaux à couvrir chaque semaine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftGroup {
    pub name: String,
    /// Créneaux requis par semaine (peut être fractionnaire).
    pub number: f64,
    /// Plus la valeur est basse, plus le groupe est servi tôt.
    #[serde(default = "default_priority")]
    pub priority: u32,
}

impl ShiftGroup {
    pub fn new<N: Into<String>>(name: N, number: f64, priority: u32) -> Self {
        Self {
            name: name.into(),
            number,
            priority,
        }
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        let invalid = |reason| ScenarioError::InvalidShiftGroup {
            name: self.name.clone(),
            reason,
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if !self.number.is_finite() || self.number < 0.0 {
            return Err(invalid("number must be a finite, non-negative number"));
        }
        Ok(())
    }
}

/// Ventilation par type d'employé (FTE ou effectif).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmployeeBreakdown {
    pub regular: f64,
    pub bece: f64,
    pub casual: f64,
    pub total: f64,
}

impl EmployeeBreakdown {
    /// Construit la ventilation en calculant le total.
    pub fn new(regular: f64, bece: f64, casual: f64) -> Self {
        Self {
            regular,
            bece,
            casual,
            total: regular + bece + casual,
        }
    }

    fn check_total(&self, which: &'static str) -> Result<(), ScenarioError> {
        let sum = self.regular + self.bece + self.casual;
        if !self.total.is_finite() || (self.total - sum).abs() > TOTAL_TOLERANCE {
            return Err(ScenarioError::InconsistentTotal {
                which,
                total: self.total,
                sum,
            });
        }
        Ok(())
    }
}

/// FTE officiels (postes) et réels (temps effectivement travaillé).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FteScenarios {
    pub official: EmployeeBreakdown,
    pub actual: EmployeeBreakdown,
}

/// Forme sérialisée d'un scénario ; passe toujours par `Scenario::new`.
#[derive(Debug, Deserialize)]
struct RawScenario {
    name: String,
    fte: FteScenarios,
    staff: EmployeeBreakdown,
    #[serde(default)]
    events: Vec<Event>,
    #[serde(default)]
    shifts: Vec<ShiftGroup>,
}

impl TryFrom<RawScenario> for Scenario {
    type Error = ScenarioError;

    fn try_from(raw: RawScenario) -> Result<Self, Self::Error> {
        Scenario::new(raw.name, raw.fte, raw.staff, raw.events, raw.shifts)
    }
}

/// Scénario d'effectifs complet, validé à la construction.
///
/// Les groupes de créneaux sont triés une fois pour toutes par
/// `(priority, name)` : c'est l'ordre de service de chaque semaine simulée.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScenario")]
pub struct Scenario {
    name: String,
    fte: FteScenarios,
    staff: EmployeeBreakdown,
    events: Vec<Event>,
    shifts: Vec<ShiftGroup>,
}

impl Scenario {
    pub fn new<N: Into<String>>(
        name: N,
        fte: FteScenarios,
        staff: EmployeeBreakdown,
        events: Vec<Event>,
        shifts: Vec<ShiftGroup>,
    ) -> Result<Self, ScenarioError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ScenarioError::EmptyName);
        }
        fte.official.check_total("official FTE")?;
        fte.actual.check_total("actual FTE")?;
        staff.check_total("staff")?;
        let capacity = fte.actual.total * SHIFTS_PER_FTE_WEEK;
        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(ScenarioError::InvalidCapacity(capacity));
        }
        let mut scenario = Self {
            name,
            fte,
            staff,
            events: Vec::new(),
            shifts: Vec::new(),
        };
        scenario.set_events(events)?;
        scenario.set_shifts(shifts)?;
        Ok(scenario)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn fte(&self) -> &FteScenarios {
        &self.fte
    }
    pub fn staff(&self) -> &EmployeeBreakdown {
        &self.staff
    }
    pub fn events(&self) -> &[Event] {
        &self.events
    }
    /// Groupes dans l'ordre de service.
    pub fn shifts(&self) -> &[ShiftGroup] {
        &self.shifts
    }

    /// Créneaux couvrables par semaine (`FTE réels × 5`).
    pub fn shift_capacity(&self) -> f64 {
        self.fte.actual.total * SHIFTS_PER_FTE_WEEK
    }

    pub fn find_event(&self, name: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.name == name)
    }

    /// Remplace les évènements après validation.
    pub fn set_events(&mut self, events: Vec<Event>) -> Result<(), ScenarioError> {
        for event in &events {
            event.validate()?;
        }
        if let Some(dup) = first_duplicate(events.iter().map(|e| e.name.as_str())) {
            return Err(ScenarioError::DuplicateEvent(dup));
        }
        self.events = events;
        Ok(())
    }

    /// Remplace les groupes de créneaux après validation et les retrie.
    pub fn set_shifts(&mut self, mut shifts: Vec<ShiftGroup>) -> Result<(), ScenarioError> {
        for shift in &shifts {
            shift.validate()?;
        }
        if let Some(dup) = first_duplicate(shifts.iter().map(|s| s.name.as_str())) {
            return Err(ScenarioError::DuplicateShiftGroup(dup));
        }
        shifts.sort_by(|a, b| (a.priority, &a.name).cmp(&(b.priority, &b.name)));
        self.shifts = shifts;
        Ok(())
    }
}

fn first_duplicate<'a>(names: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Some(name.to_string());
        }
    }
    None
}

/// Ensemble de scénarios persistés ensemble.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub scenarios: Vec<Scenario>,
}

impl ScenarioSet {
    pub fn find<'a>(&'a self, name: &str) -> Option<&'a Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Scenario> {
        self.scenarios.iter_mut().find(|s| s.name == name)
    }
}
