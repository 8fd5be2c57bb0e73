#![forbid(unsafe_code)]
//! Couverture — estimation Monte Carlo des créneaux non couverts d'un roster.
//!
//! - Scénarios d'effectifs validés à la construction (JSON/CSV).
//! - Essais indépendants, un générateur privé par essai (rayon).
//! - Moyenne + intervalle empirique 2,5 %–97,5 % par métrique.
//! - Rapports texte, exports CSV/JSON.

pub mod io;
pub mod model;
pub mod presets;
pub mod report;
pub mod simulation;
pub mod stats;
pub mod storage;
pub mod summary;

pub use model::{
    EmployeeBreakdown, Event, FteScenarios, Scenario, ScenarioError, ScenarioSet, ShiftGroup,
};
pub use report::{ReportRenderer, TextReport};
pub use simulation::{
    run_scenario, run_trials, simulate, Bucket, HorizonCounts, RunConfig, SimError, Simulator,
    TrialResult,
};
pub use stats::Stats;
pub use storage::{JsonStorage, Storage};
pub use summary::{summarize_scenario, ScenarioSummary, ALL_EVENTS, ALL_SHIFTS};
