#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use couverture::{
    io, presets,
    report::{ReportRenderer, TextReport},
    simulation::{RunConfig, Simulator, DEFAULT_CYCLE_WEEKS, DEFAULT_ITERATIONS},
    storage::{JsonStorage, Storage},
};
use std::fs;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI Monte Carlo de couverture des créneaux
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de scénarios
    #[arg(long, global = true, default_value = "scenarios.json")]
    scenarios: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Écrire les scénarios prédéfinis dans le fichier de scénarios
    Init {
        /// Écrase un fichier existant
        #[arg(long)]
        force: bool,
        /// Cycle utilisé pour les taux dérivés des volumes annuels
        #[arg(long, default_value_t = DEFAULT_CYCLE_WEEKS)]
        weeks: u32,
    },

    /// Lister les scénarios
    List,

    /// Remplacer les évènements d'un scénario depuis un CSV
    ImportEvents {
        #[arg(long)]
        scenario: String,
        #[arg(long)]
        csv: String,
    },

    /// Remplacer les groupes de créneaux d'un scénario depuis un CSV
    ImportShifts {
        #[arg(long)]
        scenario: String,
        #[arg(long)]
        csv: String,
    },

    /// Lancer les simulations et afficher le rapport
    Run {
        #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
        iterations: usize,
        #[arg(long, default_value_t = DEFAULT_CYCLE_WEEKS)]
        weeks: u32,
        /// Graine de base (essais reproductibles)
        #[arg(long)]
        seed: Option<u64>,
        /// Ne lancer qu'un scénario
        #[arg(long)]
        only: Option<String>,
        /// Désactive le parallélisme
        #[arg(long)]
        sequential: bool,
        /// Répertoire où écrire `simulation_results_<ts>.csv`
        #[arg(long)]
        out_dir: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.scenarios)?;

    match cli.cmd {
        Commands::Init { force, weeks } => {
            if storage.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    storage.path().display()
                );
            }
            let set = presets::all(weeks)?;
            storage.save(&set)?;
            println!(
                "Wrote {} scenario(s) to {}",
                set.scenarios.len(),
                storage.path().display()
            );
        }
        Commands::List => {
            let set = storage.load()?;
            for s in &set.scenarios {
                println!(
                    "{} | capacity {:.2} shifts/week | {} event(s)",
                    s.name(),
                    s.shift_capacity(),
                    s.events().len()
                );
                let (fte, staff) = (s.fte(), s.staff());
                println!(
                    "  FTE official {:.4} | actual {:.4}",
                    fte.official.total, fte.actual.total
                );
                println!(
                    "  Staff {:.0} (regular {:.0}, BECE {:.0}, casual {:.0})",
                    staff.total, staff.regular, staff.bece, staff.casual
                );
                for shift in s.shifts() {
                    println!("  [{}] {} → {:.2}", shift.priority, shift.name, shift.number);
                }
            }
        }
        Commands::ImportEvents { scenario, csv } => {
            let mut set = storage.load()?;
            let events = io::import_events_csv(&csv)?;
            let count = events.len();
            set.find_mut(&scenario)
                .ok_or_else(|| anyhow::anyhow!("unknown scenario: {}", scenario))?
                .set_events(events)
                .with_context(|| format!("importing events from {csv}"))?;
            storage.save(&set)?;
            println!("Imported {count} event(s) into {scenario}");
        }
        Commands::ImportShifts { scenario, csv } => {
            let mut set = storage.load()?;
            let shifts = io::import_shifts_csv(&csv)?;
            let count = shifts.len();
            set.find_mut(&scenario)
                .ok_or_else(|| anyhow::anyhow!("unknown scenario: {}", scenario))?
                .set_shifts(shifts)
                .with_context(|| format!("importing shifts from {csv}"))?;
            storage.save(&set)?;
            println!("Imported {count} shift group(s) into {scenario}");
        }
        Commands::Run {
            iterations,
            weeks,
            seed,
            only,
            sequential,
            out_dir,
            out_json,
            out_csv,
        } => {
            let set = storage.load()?;
            if set.scenarios.is_empty() {
                bail!("no scenario in {}", storage.path().display());
            }
            let config = RunConfig {
                iterations,
                cycle_weeks: weeks,
                base_seed: seed,
                parallel: !sequential,
            };
            eprintln!(
                "Running {} simulation(s) of {} week(s) per scenario",
                iterations, weeks
            );
            let simulator = Simulator::new(config);
            let summaries = simulator.run_all(&set, only.as_deref())?;

            let renderer = TextReport;
            for summary in &summaries {
                let scenario = set
                    .find(&summary.scenario)
                    .context("summary without scenario")?;
                println!("{}", renderer.render(scenario, summary));
            }

            if let Some(dir) = out_dir {
                fs::create_dir_all(&dir).with_context(|| format!("creating {dir}"))?;
                let path = io::timestamped_results_path(&dir, Utc::now(), "csv");
                io::export_summaries_csv(&path, &summaries)?;
                eprintln!("Writing results to file: {}", path.display());
            }
            if let Some(path) = out_json {
                io::export_summaries_json(path, &summaries)?;
            }
            if let Some(path) = out_csv {
                io::export_summaries_csv(path, &summaries)?;
            }
        }
    }

    Ok(())
}
