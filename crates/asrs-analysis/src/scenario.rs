//! End-to-end pipeline: configuration in, report out.
//!
//! ```text
//! validate → heatmap (HEATMAP stream) → build_warehouse
//!          → orders (ORDERS stream, or explicit list)
//!          → priority + proximity batching → Sim (JITTER stream) → report
//! ```
//!
//! Each random stream is derived from the workload seed alone, so changing
//! the order count never changes the heatmap or the jitter draws.

use tracing::info;

use asrs_core::{OrderSource, SimConfig, SimRng, UpgradeRule, streams};
use asrs_orders::{generate_orders, plan_dispatch, resolve_orders};
use asrs_sim::{NoopObserver, SimBuilder, SimObserver, SimResult};
use asrs_topology::{BlockedNodes, DemandHeatmap, DijkstraRouter, Router, build_warehouse};

use crate::SimulationReport;

/// A named configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioCase {
    pub name:   String,
    pub config: SimConfig,
}

/// Run `config` with the default router and no observer.
pub fn run_scenario(config: &SimConfig) -> SimResult<SimulationReport> {
    run_scenario_with(config, DijkstraRouter, &mut NoopObserver)
}

/// Run `config` with a caller-chosen router and observer.
pub fn run_scenario_with<R: Router, O: SimObserver>(
    config:   &SimConfig,
    router:   R,
    observer: &mut O,
) -> SimResult<SimulationReport> {
    config.validate()?;
    let seed      = config.workload.seed;
    let warehouse = config.effective_warehouse();

    let heatmap = config.workload.demand_heatmap.then(|| {
        let mut rng = SimRng::new(seed).child(streams::HEATMAP);
        DemandHeatmap::sample(warehouse.aisles, warehouse.levels, &mut rng)
    });
    let graph = build_warehouse(&warehouse, heatmap.as_ref())?;

    let orders = match &config.workload.orders {
        OrderSource::Synthetic { count } => {
            let mut rng = SimRng::new(seed).child(streams::ORDERS);
            generate_orders(&graph, *count, &mut rng)
        }
        OrderSource::Explicit(specs) => resolve_orders(&graph, specs)?,
    };

    let plan = plan_dispatch(&graph, &router, orders, &config.workload, &BlockedNodes::new())?;

    let mut sim = SimBuilder::new(config.clone(), graph, router)
        .plan(plan)
        .jitter_rng(SimRng::new(seed).child(streams::JITTER))
        .build()?;
    sim.run(observer)?;

    let report = SimulationReport::new(sim.into_outcome(), config);
    info!(
        robots = config.fleet.robot_count,
        transactions = report.kpis.transactions,
        avg_secs = report.kpis.average_transaction_secs,
        throughput = report.kpis.throughput_per_hour,
        "scenario complete"
    );
    Ok(report)
}

/// Run every configuration independently.  Results keep input order.
///
/// With the `parallel` feature the runs execute on Rayon's thread pool; each
/// run is still single-threaded and seeded from its own config.
pub fn run_sweep(configs: &[SimConfig]) -> Vec<SimResult<SimulationReport>> {
    #[cfg(not(feature = "parallel"))]
    {
        configs.iter().map(run_scenario).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        configs.par_iter().map(run_scenario).collect()
    }
}

/// The reference case table: fleet size, extraction time and workload
/// varied over the default 10 × 5 rack.  Fleets extracting in under 2 s pay
/// the upgrade surcharge.
pub fn reference_cases() -> Vec<ScenarioCase> {
    const TABLE: [(&str, u32, f64, usize); 8] = [
        ("base case",                   1, 2.0, 1_000),
        ("two robots",                  2, 2.0, 1_000),
        ("three robots",                3, 2.0, 1_000),
        ("upgraded extraction",         1, 1.0, 1_000),
        ("higher workload",             1, 2.0, 5_000),
        ("higher workload, two robots", 2, 2.0, 5_000),
        ("two robots, upgraded",        2, 1.0, 5_000),
        ("three robots, upgraded",      3, 1.0, 5_000),
    ];

    TABLE
        .iter()
        .map(|&(name, robots, extraction, count)| {
            let mut config = SimConfig::default();
            config.fleet.robot_count     = robots;
            config.fleet.extraction_secs = extraction;
            config.fleet.upgrade         = UpgradeRule::ExtractionBelow(2.0);
            config.workload.orders       = OrderSource::Synthetic { count };
            ScenarioCase { name: name.to_string(), config }
        })
        .collect()
}
