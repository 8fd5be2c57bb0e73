use crate::model::Scenario;
use crate::simulation::Bucket;
use crate::summary::ScenarioSummary;
use std::fmt::Write;

/// Permet de customiser le rendu du rapport (texte, tableur, etc.).
pub trait ReportRenderer {
    fn render(&self, scenario: &Scenario, summary: &ScenarioSummary) -> String;
}

/// Rapport texte, une section par bloc de résultats.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReport;

impl ReportRenderer for TextReport {
    fn render(&self, scenario: &Scenario, summary: &ScenarioSummary) -> String {
        let mut out = String::new();
        // l'écriture dans une String ne peut pas échouer
        let _ = write_report(&mut out, scenario, summary);
        out
    }
}

fn write_report(
    out: &mut String,
    scenario: &Scenario,
    summary: &ScenarioSummary,
) -> std::fmt::Result {
    writeln!(out, "=== {} ===", summary.scenario)?;
    writeln!(out)?;
    writeln!(out, "SIMULATION DETAILS")?;
    writeln!(out, "  Number of Simulations: {}", summary.iterations)?;
    writeln!(out, "  Length of Simulation Cycle (weeks): {}", summary.cycle_weeks)?;
    writeln!(out, "  Shift Capacity (shifts per week): {:.2}", scenario.shift_capacity())?;
    writeln!(out)?;

    writeln!(out, "EVENT DETAILS")?;
    for event in scenario.events() {
        let cap = event
            .cycle_max
            .map_or_else(|| "-".to_string(), |max| max.to_string());
        writeln!(
            out,
            "  {}: changes {:.2}, losses {:.2}, rates total {:.4} \
             [{:.4} / {:.4} / {:.4} / {:.4}], cycle max {}",
            event.name,
            event.changes,
            event.losses,
            event.rate_total(),
            event.rate_0,
            event.rate_2,
            event.rate_4,
            event.rate_12,
            cap
        )?;
    }
    writeln!(out)?;

    writeln!(out, "EVENT RESULTS")?;
    for event in &summary.events {
        writeln!(out, "  {}", event.name)?;
        for bucket in Bucket::ALL {
            writeln!(out, "    {}: {}", bucket.label(), event.stats.get(bucket))?;
        }
    }
    writeln!(out)?;

    writeln!(out, "SHIFT DETAILS")?;
    for shift in scenario.shifts() {
        writeln!(
            out,
            "  {}: {:.2} shifts per week, priority {}",
            shift.name, shift.number, shift.priority
        )?;
    }
    writeln!(out)?;

    writeln!(out, "UNCOVERED SHIFT RESULTS (per cycle)")?;
    for shift in &summary.uncovered {
        writeln!(out, "  {}: {}", shift.name, shift.uncovered)?;
    }
    writeln!(out)?;

    writeln!(out, "EXCESS SHIFT RESULTS (per cycle)")?;
    writeln!(out, "  Number of Excess Shifts: {}", summary.excess_capacity)?;
    writeln!(out)?;

    writeln!(out, "NUMBER OF SHIFT CHANGES")?;
    for bucket in Bucket::ALL {
        writeln!(out, "  {}: {}", bucket.label(), summary.changes.get(bucket))?;
    }
    Ok(())
}
