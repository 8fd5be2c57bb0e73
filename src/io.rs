use crate::model::{Event, ShiftGroup};
use crate::simulation::Bucket;
use crate::stats::Stats;
use crate::summary::ScenarioSummary;
use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Import d'évènements: header `name,changes,losses,rate_0,rate_2,rate_4,rate_12[,cycle_max]`
pub fn import_events_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Event>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            warn!(line = line + 2, "skipping event row without name");
            continue;
        }
        let changes = parse_f64(&rec, 1)
            .with_context(|| format!("invalid changes for event {name}"))?
            .with_context(|| format!("missing changes for event {name}"))?;
        let losses = parse_f64(&rec, 2)
            .with_context(|| format!("invalid losses for event {name}"))?
            .with_context(|| format!("missing losses for event {name}"))?;
        let mut event = Event::new(name, changes, losses);
        for (idx, slot) in [3usize, 4, 5, 6].into_iter().zip([
            &mut event.rate_0,
            &mut event.rate_2,
            &mut event.rate_4,
            &mut event.rate_12,
        ]) {
            *slot = parse_f64(&rec, idx)
                .with_context(|| format!("invalid rate for event {name}"))?
                .unwrap_or(0.0);
        }
        if let Some(raw) = rec.get(7).map(str::trim).filter(|s| !s.is_empty()) {
            let max: u64 = raw
                .parse()
                .with_context(|| format!("invalid cycle_max for event {name}"))?;
            event.cycle_max = Some(max);
        }
        out.push(event);
    }
    Ok(out)
}

/// Import de groupes de créneaux: header `name,number[,priority]`
pub fn import_shifts_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<ShiftGroup>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid shift row (empty name)");
        }
        let number = parse_f64(&rec, 1)
            .with_context(|| format!("invalid number for shift {name}"))?
            .with_context(|| format!("missing number for shift {name}"))?;
        let priority = match rec.get(2).map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid priority for shift {name}"))?,
            None => 1,
        };
        out.push(ShiftGroup::new(name, number, priority));
    }
    Ok(out)
}

fn parse_f64(rec: &StringRecord, idx: usize) -> anyhow::Result<Option<f64>> {
    match rec.get(idx).map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => {
            let value = raw
                .parse::<f64>()
                .with_context(|| format!("expected number, got {raw}"))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Export JSON des résumés (jolie mise en forme)
pub fn export_summaries_json<P: AsRef<Path>>(
    path: P,
    summaries: &[ScenarioSummary],
) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(summaries)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des résumés: header `scenario,section,name,horizon,mean,ci_lower,ci_upper`
pub fn export_summaries_csv<P: AsRef<Path>>(
    path: P,
    summaries: &[ScenarioSummary],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["scenario", "section", "name", "horizon", "mean", "ci_lower", "ci_upper"])?;
    for summary in summaries {
        let scenario = summary.scenario.as_str();
        let mut row = |section: &str, name: &str, horizon: &str, stats: &Stats| {
            w.write_record([
                scenario,
                section,
                name,
                horizon,
                stats.mean.to_string().as_str(),
                stats.ci_lower.to_string().as_str(),
                stats.ci_upper.to_string().as_str(),
            ])
        };
        for event in &summary.events {
            for bucket in Bucket::ALL {
                row("events", &event.name, bucket.key(), event.stats.get(bucket))?;
            }
        }
        for shift in &summary.uncovered {
            row("uncovered_shifts", &shift.name, "total", &shift.uncovered)?;
        }
        row("excess_capacity", "Number of Excess Shifts", "total", &summary.excess_capacity)?;
        for bucket in Bucket::ALL {
            let stats = summary.changes.get(bucket);
            row("shift_changes", "Number of Shift Changes", bucket.key(), stats)?;
        }
    }
    w.flush()?;
    Ok(())
}

/// `dir/simulation_results_<unix-ts>.<ext>`
pub fn timestamped_results_path<P: AsRef<Path>>(dir: P, now: DateTime<Utc>, ext: &str) -> PathBuf {
    dir.as_ref()
        .join(format!("simulation_results_{}.{ext}", now.timestamp()))
}
