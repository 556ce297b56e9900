//! scenarios — runs the shuttle-warehouse simulator end to end.
//!
//! With no arguments: evaluates the eight reference cases (fleet size,
//! extraction time, workload) as one sweep, prints the comparison table,
//! then replays one case step by step with an aisle blocked mid-run.
//!
//! With a path argument: loads a JSON `SimConfig` from that file and prints
//! its full report.
//!
//! Per-case summaries are written to `output/scenarios/summary.json`.
//! Set `RUST_LOG=debug` to see every dispatch.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use asrs_analysis::{SimulationReport, reference_cases, run_scenario, run_sweep};
use asrs_core::{NodeId, OrderSource, SimConfig, SimRng, Slot, streams};
use asrs_orders::{generate_orders, plan_dispatch};
use asrs_sim::{SimBuilder, SimIssue, SimObserver, StepOutcome, TransactionRecord};
use asrs_topology::{BlockedNodes, DijkstraRouter, build_warehouse};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR:       &str  = "output/scenarios";
const REROUTE_ORDERS:   usize = 300;
const BLOCK_AFTER:      usize = 100;
const UNBLOCK_AFTER:    usize = 200;

// ── Observer for the rerouting replay ─────────────────────────────────────────

#[derive(Default)]
struct DelayTally {
    dispatched: usize,
    delayed:    usize,
    delay_secs: f64,
    issues:     Vec<String>,
}

impl SimObserver for DelayTally {
    fn on_dispatch(&mut self, record: &TransactionRecord) {
        self.dispatched += 1;
        if record.delay_secs > 0.0 {
            self.delayed    += 1;
            self.delay_secs += record.delay_secs;
        }
    }

    fn on_issue(&mut self, issue: &SimIssue) {
        self.issues.push(issue.to_string());
    }
}

// ── Printing ──────────────────────────────────────────────────────────────────

fn print_table(rows: &[(String, SimConfig, SimulationReport)]) {
    println!(
        "{:<4} {:<28} {:>6} {:>8} {:>7} {:>10} {:>12} {:>10} {:>9}",
        "Case", "Name", "Robots", "Extract", "Orders", "Avg (s)", "Thru (/h)", "$/txn", "Overlaps"
    );
    println!("{}", "-".repeat(102));
    for (i, (name, cfg, report)) in rows.iter().enumerate() {
        let orders = match &cfg.workload.orders {
            OrderSource::Synthetic { count } => *count,
            OrderSource::Explicit(specs) => specs.len(),
        };
        let cost = report
            .cost_per_transaction()
            .map_or_else(|| "n/a".to_string(), |c| format!("{c:.4}"));
        println!(
            "{:<4} {:<28} {:>6} {:>8.1} {:>7} {:>10.2} {:>12.1} {:>10} {:>9}",
            i + 1,
            name,
            cfg.fleet.robot_count,
            cfg.fleet.extraction_secs,
            orders,
            report.average_transaction_secs(),
            report.throughput_per_hour(),
            cost,
            report.overlaps.total_overlaps,
        );
    }
}

fn print_report(report: &SimulationReport) {
    let k = &report.kpis;
    println!("Transactions         : {}", k.transactions);
    println!("Skipped orders       : {}", report.skipped_orders());
    println!("Avg transaction (s)  : {:.2}", k.average_transaction_secs);
    println!("Throughput (/h)      : {:.1}", k.throughput_per_hour);
    println!("Shift transactions   : {:.0}", k.shift_transactions);
    match k.cost_per_transaction {
        Some(c) => println!("Cost per transaction : ${c:.4}"),
        None    => println!("Cost per transaction : unavailable"),
    }
    println!("Makespan (s)         : {:.1}", k.makespan_secs);
    println!("Distance (m)         : {:.1}", k.total_distance_m);
    println!("Per-robot orders     : {:?}", k.per_robot);
    println!();

    let o = &report.overlaps;
    println!(
        "Overlaps: {}  delay {:.1} s  avg {:.2} s/overlap  cost ${:.2}",
        o.total_overlaps, o.total_delay_secs, o.average_delay_secs, o.total_delay_cost
    );
    if !o.per_aisle.is_empty() {
        println!("{:<6} {:>9} {:>11} {:>9}", "Aisle", "Overlaps", "Delay (s)", "Cost ($)");
        for (aisle, a) in &o.per_aisle {
            println!("{:<6} {:>9} {:>11.1} {:>9.2}", aisle, a.overlaps, a.delay_secs, a.cost);
        }
    }
    for line in report.issue_messages().iter().take(10) {
        println!("  issue: {line}");
    }
}

// ── Dynamic blocking replay ───────────────────────────────────────────────────

/// Replays a two-robot case one order at a time, blocking the bottom of
/// aisle 4 for the middle third of the run.
fn rerouting_replay() -> Result<()> {
    let mut config = SimConfig::default();
    config.fleet.robot_count = 2;
    config.workload.orders   = OrderSource::Synthetic { count: REROUTE_ORDERS };
    let seed = config.workload.seed;

    let graph  = build_warehouse(&config.effective_warehouse(), None)?;
    let orders = generate_orders(&graph, REROUTE_ORDERS, &mut SimRng::new(seed).child(streams::ORDERS));
    let plan   = plan_dispatch(&graph, &DijkstraRouter, orders, &config.workload, &BlockedNodes::new())?;
    let blocked: NodeId = graph
        .storage_node(Slot::new(4, 0))
        .context("slot (4, 0) missing from the rack")?;

    let mut sim = SimBuilder::new(config, graph, DijkstraRouter).plan(plan).build()?;
    let mut tally = DelayTally::default();

    let mut steps = 0;
    let mut skipped = 0;
    while let Some(outcome) = sim.step(&mut tally)? {
        steps += 1;
        if matches!(outcome, StepOutcome::Skipped(_)) {
            skipped += 1;
        }
        if steps == BLOCK_AFTER {
            sim.block_node(blocked)?;
            info!(node = %blocked, "blocking node");
        }
        if steps == UNBLOCK_AFTER {
            sim.unblock_node(blocked);
            info!(node = %blocked, "unblocking node");
        }
    }

    println!(
        "Replay: {} orders, {} dispatched, {} skipped while {} was blocked",
        steps, tally.dispatched, skipped, blocked
    );
    println!(
        "  {} delayed transactions, {:.1} s total delay",
        tally.delayed, tally.delay_secs
    );
    for line in tally.issues.iter().take(5) {
        println!("  issue: {line}");
    }
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("=== scenarios — shuttle warehouse simulator ===");
    println!();

    if let Some(path) = std::env::args().nth(1) {
        let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
        let config: SimConfig = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
        let report = run_scenario(&config)?;
        print_report(&report);
        return Ok(());
    }

    // 1. Reference sweep.
    let cases = reference_cases();
    let configs: Vec<SimConfig> = cases.iter().map(|c| c.config.clone()).collect();
    let t0 = Instant::now();
    let results = run_sweep(&configs);
    let elapsed = t0.elapsed();

    let mut rows = Vec::with_capacity(cases.len());
    for (case, result) in cases.into_iter().zip(results) {
        let report = result.with_context(|| format!("case '{}'", case.name))?;
        rows.push((case.name, case.config, report));
    }
    print_table(&rows);
    println!();
    println!("Sweep complete in {:.3} s", elapsed.as_secs_f64());
    println!();

    // 2. Summaries to disk.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let summary: Vec<_> = rows
        .iter()
        .map(|(name, _, report)| {
            serde_json::json!({
                "name":     name,
                "kpis":     report.kpis,
                "overlaps": report.overlaps,
                "issues":   report.issue_messages(),
            })
        })
        .collect();
    let out = Path::new(OUTPUT_DIR).join("summary.json");
    std::fs::write(&out, serde_json::to_string_pretty(&summary)?)?;
    println!("Wrote {}", out.display());
    println!();

    // 3. Dynamic blocking.
    rerouting_replay()
}
