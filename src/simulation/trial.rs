use super::coverage::CoverageLedger;
use super::types::{Bucket, EventOutcome, HorizonCounts, SimError, TrialResult};
use crate::model::{Event, Scenario};
use rand::Rng;
use rand_distr::{Binomial, Distribution};

/// Tirages hebdomadaires d'un évènement : une binomiale par fenêtre.
struct EventSampler<'a> {
    event: &'a Event,
    draws: [Binomial; 4],
}

impl<'a> EventSampler<'a> {
    fn new(event: &'a Event, trials: u64) -> Result<Self, SimError> {
        let binomial = |rate: f64| {
            Binomial::new(trials, rate).map_err(|_| SimError::InvalidRate {
                event: event.name.clone(),
                rate,
            })
        };
        let [r0, r2, r4, r12] = event.rates();
        Ok(Self {
            event,
            draws: [binomial(r0)?, binomial(r2)?, binomial(r4)?, binomial(r12)?],
        })
    }

    /// Le plafond est vérifié avant les tirages de la semaine.
    fn capped(&self, total_so_far: u64) -> bool {
        self.event.cycle_max.is_some_and(|max| total_so_far >= max)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> [u64; 4] {
        std::array::from_fn(|i| self.draws[i].sample(rng))
    }
}

/// Simule un cycle de `cycle_weeks` semaines pour un scénario.
///
/// Chaque semaine : tirage des occurrences de chaque évènement non plafonné,
/// cumul des changements d'horaire et des pertes de capacité, puis
/// répartition de la capacité restante entre les groupes de créneaux par
/// ordre de priorité. Le générateur `rng` appartient à cet essai seul.
pub fn simulate<R: Rng + ?Sized>(
    cycle_weeks: u32,
    scenario: &Scenario,
    rng: &mut R,
) -> Result<TrialResult, SimError> {
    let capacity = scenario.shift_capacity();
    if !capacity.is_finite() || capacity <= 0.0 {
        return Err(SimError::InvalidCapacity(capacity));
    }
    // nombre d'épreuves des binomiales : capacité tronquée
    let trials = capacity.trunc() as u64;

    let samplers = scenario
        .events()
        .iter()
        .map(|event| EventSampler::new(event, trials))
        .collect::<Result<Vec<_>, _>>()?;

    let mut events: Vec<EventOutcome> = scenario
        .events()
        .iter()
        .map(|event| EventOutcome {
            name: event.name.clone(),
            counts: HorizonCounts::default(),
        })
        .collect();
    let mut changes = HorizonCounts::<f64>::default();
    let mut coverage = CoverageLedger::new(scenario.shifts());

    for _ in 0..cycle_weeks {
        let mut week_losses = 0.0;

        for (sampler, outcome) in samplers.iter().zip(events.iter_mut()) {
            if sampler.capped(outcome.counts.total) {
                continue;
            }
            let drawn = sampler.sample(rng);
            let week_total: u64 = drawn.iter().sum();
            let per_change = sampler.event.changes;

            for (bucket, count) in Bucket::HORIZONS.into_iter().zip(drawn) {
                *outcome.counts.get_mut(bucket) += count;
                *changes.get_mut(bucket) += count as f64 * per_change;
            }
            outcome.counts.total += week_total;
            changes.total += week_total as f64 * per_change;
            week_losses += week_total as f64 * sampler.event.losses;
        }

        coverage.record_week(capacity - week_losses);
    }

    let (uncovered, excess_capacity) = coverage.finish();
    Ok(TrialResult {
        events,
        uncovered,
        excess_capacity,
        changes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EmployeeBreakdown, FteScenarios, ShiftGroup};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn scenario(fte: f64, events: Vec<Event>, shifts: Vec<ShiftGroup>) -> Scenario {
        let breakdown = EmployeeBreakdown::new(fte, 0.0, 0.0);
        Scenario::new(
            "test",
            FteScenarios { official: breakdown, actual: breakdown },
            breakdown,
            events,
            shifts,
        )
        .unwrap()
    }

    #[test]
    fn certain_event_hits_every_week_until_cap() {
        // capacité 10, p = 1 : 10 occurrences par semaine, plafond 25 atteint en semaine 3
        let s = scenario(
            2.0,
            vec![Event::new("Sure", 2.0, 0.0)
                .with_rates(1.0, 0.0, 0.0, 0.0)
                .with_cycle_max(25)],
            vec![],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = simulate(6, &s, &mut rng).unwrap();
        let counts = result.events[0].counts;
        assert_eq!(counts.total, 30);
        assert_eq!(counts.weeks_0, 30);
        assert_eq!(result.changes.total, 60.0);
        assert_eq!(result.changes.weeks_0, 60.0);
        assert_eq!(result.changes.weeks_12, 0.0);
    }

    #[test]
    fn losses_reduce_capacity_for_lower_priorities() {
        // capacité 10 ; 10 pertes certaines par semaine -> rien n'est couvert
        let s = scenario(
            2.0,
            vec![Event::new("Sure", 0.0, 1.0).with_rates(0.0, 0.0, 0.0, 1.0)],
            vec![ShiftGroup::new("A", 4.0, 1), ShiftGroup::new("B", 3.0, 2)],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let result = simulate(4, &s, &mut rng).unwrap();
        assert_eq!(result.shift("A").unwrap().uncovered, 16.0);
        assert_eq!(result.shift("B").unwrap().uncovered, 12.0);
        assert_eq!(result.excess_capacity, 0.0);
        assert_eq!(result.changes.total, 0.0);
    }

    #[test]
    fn fractional_capacity_is_truncated_for_draws() {
        // capacité 7.5 -> 7 épreuves, p = 1
        let s = scenario(
            1.5,
            vec![Event::new("Sure", 1.0, 0.0).with_rates(0.0, 1.0, 0.0, 0.0)],
            vec![],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let result = simulate(1, &s, &mut rng).unwrap();
        assert_eq!(result.events[0].counts.weeks_2, 7);
        assert_eq!(result.excess_capacity, 7.5);
    }
}
