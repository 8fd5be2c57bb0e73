#![forbid(unsafe_code)]
use couverture::{
    presets, simulate, summarize_scenario, EmployeeBreakdown, Event, FteScenarios, RunConfig,
    Scenario, ShiftGroup, Simulator, Stats, ALL_EVENTS, ALL_SHIFTS,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn scenario(fte: f64, events: Vec<Event>, shifts: Vec<ShiftGroup>) -> Scenario {
    let b = EmployeeBreakdown::new(fte, 0.0, 0.0);
    Scenario::new("test", FteScenarios { official: b, actual: b }, b, events, shifts).unwrap()
}

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

#[test]
fn zero_rate_events_never_occur() {
    let s = scenario(
        10.0,
        vec![
            Event::new("Unbounded", 1.5, 1.0),
            Event::new("Capped", 1.5, 1.0).with_cycle_max(5),
            Event::new("Zero cap", 1.5, 1.0).with_cycle_max(0),
        ],
        vec![ShiftGroup::new("Dispensary", 40.0, 1)],
    );
    for seed in 0..20 {
        let result = simulate(52, &s, &mut rng(seed)).unwrap();
        assert_eq!(result.events.len(), 3);
        for outcome in &result.events {
            assert_eq!(outcome.counts.total, 0, "{}", outcome.name);
            assert_eq!(outcome.counts.weeks_0 + outcome.counts.weeks_12, 0);
        }
        assert_eq!(result.changes.total, 0.0);
    }
}

#[test]
fn zero_cycle_max_blocks_every_occurrence() {
    let s = scenario(
        10.0,
        vec![Event::new("Blocked", 1.5, 1.0)
            .with_rates(0.5, 0.5, 0.5, 0.5)
            .with_cycle_max(0)],
        vec![],
    );
    for seed in 0..10 {
        let result = simulate(52, &s, &mut rng(seed)).unwrap();
        assert_eq!(result.event("Blocked").unwrap().counts.total, 0);
    }
}

#[test]
fn exact_capacity_leaves_nothing_uncovered_or_spare() {
    // 4 FTE -> 20 créneaux par semaine
    let s = scenario(4.0, vec![], vec![ShiftGroup::new("Dispensary", 20.0, 1)]);
    let result = simulate(52, &s, &mut rng(1)).unwrap();
    assert_eq!(result.shift("Dispensary").unwrap().uncovered, 0.0);
    assert_eq!(result.excess_capacity, 0.0);
}

#[test]
fn shortfall_equals_demand_minus_capacity() {
    // 3 FTE -> 15 créneaux pour 20 demandés
    let s = scenario(3.0, vec![], vec![ShiftGroup::new("Dispensary", 20.0, 1)]);
    let one_week = simulate(1, &s, &mut rng(1)).unwrap();
    assert_eq!(one_week.shift("Dispensary").unwrap().uncovered, 5.0);
    let ten_weeks = simulate(10, &s, &mut rng(1)).unwrap();
    assert_eq!(ten_weeks.shift("Dispensary").unwrap().uncovered, 50.0);
    assert_eq!(ten_weeks.excess_capacity, 0.0);
}

#[test]
fn higher_priority_group_is_served_first() {
    // 15 créneaux, deux groupes de 10 : seul le prioritaire est couvert
    let s = scenario(
        3.0,
        vec![],
        vec![ShiftGroup::new("Acute Care", 10.0, 2), ShiftGroup::new("Zeta", 10.0, 1)],
    );
    let result = simulate(4, &s, &mut rng(1)).unwrap();
    assert_eq!(result.shift("Zeta").unwrap().uncovered, 0.0);
    assert_eq!(result.shift("Acute Care").unwrap().uncovered, 20.0);
    assert_eq!(result.uncovered[0].name, "Zeta");
}

#[test]
fn equal_priority_breaks_ties_by_name() {
    let s = scenario(
        3.0,
        vec![],
        vec![ShiftGroup::new("B", 10.0, 1), ShiftGroup::new("A", 10.0, 1)],
    );
    let result = simulate(1, &s, &mut rng(1)).unwrap();
    assert_eq!(result.shift("A").unwrap().uncovered, 0.0);
    assert_eq!(result.shift("B").unwrap().uncovered, 5.0);
}

#[test]
fn zero_week_cycle_is_all_zeros() {
    let s = presets::no_im_teams(52).unwrap();
    let result = simulate(0, &s, &mut rng(9)).unwrap();
    assert_eq!(result.events.len(), 12);
    assert!(result.events.iter().all(|e| e.counts.total == 0));
    assert!(result.uncovered.iter().all(|s| s.uncovered == 0.0));
    assert_eq!(result.excess_capacity, 0.0);
    assert_eq!(result.changes.total, 0.0);
}

#[test]
fn independent_seeds_differ_but_share_shape() {
    let s = presets::no_im_teams(52).unwrap();
    let a = simulate(52, &s, &mut rng(1)).unwrap();
    let b = simulate(52, &s, &mut rng(2)).unwrap();

    let names = |r: &couverture::TrialResult| {
        (
            r.events.iter().map(|e| e.name.clone()).collect::<Vec<_>>(),
            r.uncovered.iter().map(|s| s.name.clone()).collect::<Vec<_>>(),
        )
    };
    assert_eq!(names(&a), names(&b));
    assert_ne!(a.all_events().total, 0);
    assert_ne!(a, b);
}

#[test]
fn all_events_series_is_elementwise_sum() {
    let s = presets::no_im_teams(52).unwrap();
    let config = RunConfig { iterations: 50, base_seed: Some(11), ..RunConfig::default() };
    let results = Simulator::new(config).run_trials(&s).unwrap();

    for r in &results {
        let sum: u64 = r.events.iter().map(|e| e.counts.total).sum();
        assert_eq!(r.all_events().total, sum);
    }

    let summary = summarize_scenario(&s, 52, &results).unwrap();
    let expected: Vec<f64> = results.iter().map(|r| r.all_events().total as f64).collect();
    assert_eq!(summary.events[0].name, ALL_EVENTS);
    assert_eq!(summary.events[0].stats.total, Stats::summarize(&expected).unwrap());

    let uncovered: Vec<f64> = results.iter().map(|r| r.total_uncovered()).collect();
    assert_eq!(summary.uncovered[0].name, ALL_SHIFTS);
    assert_eq!(summary.uncovered[0].uncovered, Stats::summarize(&uncovered).unwrap());
}

#[test]
fn capped_events_stop_once_cap_is_reached() {
    let s = presets::no_im_teams(52).unwrap();
    let cap = s.find_event("Education Days").unwrap().cycle_max.unwrap();
    for seed in 0..20 {
        let result = simulate(52, &s, &mut rng(seed)).unwrap();
        let total = result.event("Education Days").unwrap().counts.total;
        // au plus une semaine de tirages au-delà du plafond
        assert!(total < cap + s.shift_capacity() as u64 * 4);
    }
}

#[test]
fn seeded_scenario_runs_are_reproducible() {
    let s = presets::no_im_teams(52).unwrap();
    let config = RunConfig { iterations: 40, base_seed: Some(3), ..RunConfig::default() };
    let first = Simulator::new(config).run(&s).unwrap();
    let second = Simulator::new(RunConfig { parallel: false, ..config }).run(&s).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.events.len(), 13);
    assert_eq!(first.uncovered.len(), 8);
    assert!(first.excess_capacity.ci_lower <= first.excess_capacity.mean);
    assert!(first.excess_capacity.mean <= first.excess_capacity.ci_upper);
}

#[test]
fn unknown_scenario_is_reported() {
    let set = presets::all(52).unwrap();
    let sim = Simulator::new(RunConfig { iterations: 2, ..RunConfig::default() });
    let err = sim.run_all(&set, Some("Nope")).unwrap_err();
    assert_eq!(err.to_string(), "unknown scenario: Nope");
}
