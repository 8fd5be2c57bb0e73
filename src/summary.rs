use crate::model::Scenario;
use crate::simulation::{Bucket, HorizonCounts, SimError, TrialResult};
use crate::stats::Stats;
use serde::Serialize;
use tracing::info;

/// Série synthétique : somme de tous les évènements.
pub const ALL_EVENTS: &str = "All Events";
/// Série synthétique : somme de tous les groupes de créneaux.
pub const ALL_SHIFTS: &str = "All Shifts";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub name: String,
    pub stats: HorizonCounts<Stats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftSummary {
    pub name: String,
    pub uncovered: Stats,
}

/// Statistiques d'un scénario sur l'ensemble de ses essais.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    pub scenario: String,
    pub iterations: usize,
    pub cycle_weeks: u32,
    /// `All Events` en tête, puis chaque évènement déclaré.
    pub events: Vec<EventSummary>,
    /// `All Shifts` en tête, puis chaque groupe dans l'ordre de service.
    pub uncovered: Vec<ShiftSummary>,
    pub excess_capacity: Stats,
    pub changes: HorizonCounts<Stats>,
}

impl ScenarioSummary {
    pub fn event(&self, name: &str) -> Option<&EventSummary> {
        self.events.iter().find(|e| e.name == name)
    }
    pub fn shift(&self, name: &str) -> Option<&ShiftSummary> {
        self.uncovered.iter().find(|s| s.name == name)
    }
}

fn bucket_stats(series: &[HorizonCounts<f64>]) -> Result<HorizonCounts<Stats>, SimError> {
    HorizonCounts::try_from_fn(|bucket: Bucket| {
        let values: Vec<f64> = series.iter().map(|c| *c.get(bucket)).collect();
        Stats::summarize(&values)
    })
}

fn as_f64(counts: &HorizonCounts<u64>) -> HorizonCounts<f64> {
    counts.map(|v| *v as f64)
}

/// Regroupe les résultats bruts par métrique et résume chaque série.
pub fn summarize_scenario(
    scenario: &Scenario,
    cycle_weeks: u32,
    results: &[TrialResult],
) -> Result<ScenarioSummary, SimError> {
    if results.is_empty() {
        return Err(SimError::EmptySeries);
    }

    let all_events: Vec<HorizonCounts<f64>> =
        results.iter().map(|r| as_f64(&r.all_events())).collect();
    let mut events = vec![EventSummary {
        name: ALL_EVENTS.to_string(),
        stats: bucket_stats(&all_events)?,
    }];
    for event in scenario.events() {
        let series = results
            .iter()
            .map(|r| {
                r.event(&event.name)
                    .map(|o| as_f64(&o.counts))
                    .ok_or_else(|| SimError::ShapeMismatch(event.name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        events.push(EventSummary {
            name: event.name.clone(),
            stats: bucket_stats(&series)?,
        });
    }

    let all_shifts: Vec<f64> = results.iter().map(TrialResult::total_uncovered).collect();
    let mut uncovered = vec![ShiftSummary {
        name: ALL_SHIFTS.to_string(),
        uncovered: Stats::summarize(&all_shifts)?,
    }];
    for shift in scenario.shifts() {
        let series = results
            .iter()
            .map(|r| {
                r.shift(&shift.name)
                    .map(|o| o.uncovered)
                    .ok_or_else(|| SimError::ShapeMismatch(shift.name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        uncovered.push(ShiftSummary {
            name: shift.name.clone(),
            uncovered: Stats::summarize(&series)?,
        });
    }

    let excess: Vec<f64> = results.iter().map(|r| r.excess_capacity).collect();
    let changes: Vec<HorizonCounts<f64>> = results.iter().map(|r| r.changes).collect();

    let summary = ScenarioSummary {
        scenario: scenario.name().to_string(),
        iterations: results.len(),
        cycle_weeks,
        events,
        uncovered,
        excess_capacity: Stats::summarize(&excess)?,
        changes: bucket_stats(&changes)?,
    };
    info!(
        scenario = %summary.scenario,
        iterations = summary.iterations,
        uncovered_mean = summary.uncovered[0].uncovered.mean,
        "scenario summarized"
    );
    Ok(summary)
}
