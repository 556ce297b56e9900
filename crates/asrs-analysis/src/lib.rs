//! `asrs-analysis` — reduces a simulation run to the metrics a planner reads.
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`overlap`]  | `OverlapSummary`: congestion totals and per-aisle breakdown   |
//! | [`kpi`]      | `FleetKpis`: throughput, shift volume, cost per transaction   |
//! | [`report`]   | `SimulationReport`: records + issues + both summaries         |
//! | [`scenario`] | `run_scenario`, `run_sweep`, the reference case table         |
//!
//! Every ratio has a defined value on empty input: averages and throughput
//! are 0, cost per transaction is `None`.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | `run_sweep` evaluates scenarios on Rayon's thread pool.   |
//! | `fx-hash`  | Forwards to `asrs-sim/fx-hash`.                           |
//! | `serde`    | Derives `Serialize`/`Deserialize` on reports.             |

pub mod kpi;
pub mod overlap;
pub mod report;
pub mod scenario;


pub use kpi::{FleetKpis, fleet_kpis};
pub use overlap::{AisleOverlap, OverlapSummary, analyze_overlaps};
pub use report::SimulationReport;
pub use scenario::{ScenarioCase, reference_cases, run_scenario, run_scenario_with, run_sweep};
