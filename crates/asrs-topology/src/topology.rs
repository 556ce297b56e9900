//! Movement-rule topology builder.
//!
//! # Grid mode
//!
//! ```text
//!   level L-1  ●──●──●──●   ← transfer car (horizontal edges)
//!              │  │  │  │
//!   level 1    ●  ●  ●  ●   ← lifts only (vertical edges)
//!              │  │  │  │
//!   level 0    ●──●──●──●   ← transfer car
//!            aisle 0 … A-1
//! ```
//!
//! - Vertical: `(a, l) ↔ (a, l+1)`, `level_height / speed_z` seconds.
//! - Horizontal: `(a, l) ↔ (a+1, l)` on the first and last level only,
//!   `aisle_length / speed_x` seconds.
//! - Depot: every boundary-level node ↔ depot, weighted by the kinematic
//!   model scaled by the slot's demand factor.
//!
//! # Direct mode
//!
//! No rack-internal edges; every storage node ↔ depot with the same depot
//! edge weight.  Coarse studies only.
//!
//! Both modes finish with [`validate_connectivity`], which fails the build if
//! any storage node cannot reach the depot.

use std::collections::VecDeque;

use tracing::info;

use asrs_core::{Slot, TopologyMode, WarehouseConfig, adjusted_travel_time};

use crate::{DemandHeatmap, TopologyError, TopologyResult, WarehouseGraph, WarehouseGraphBuilder};

/// Build and validate the graph for `config`.
///
/// `heatmap` scales depot edges; `None` means factor 1.0 everywhere.
pub fn build_warehouse(
    config:  &WarehouseConfig,
    heatmap: Option<&DemandHeatmap>,
) -> TopologyResult<WarehouseGraph> {
    config.validate()?;

    let mut b = WarehouseGraphBuilder::with_capacity(
        config.aisles,
        config.levels,
        estimated_edges(config),
    );
    match config.mode {
        TopologyMode::Grid   => add_grid_edges(&mut b, config, heatmap)?,
        TopologyMode::Direct => add_direct_edges(&mut b, config, heatmap)?,
    }
    let graph = b.build();
    validate_connectivity(&graph)?;

    info!(
        aisles = config.aisles,
        levels = config.levels,
        mode = ?config.mode,
        edges = graph.edge_count(),
        "warehouse graph built"
    );
    Ok(graph)
}

/// Seconds on the depot edge of `slot`.
///
/// The horizontal and vertical offsets are proportional to the slot's
/// position in the rack: `dx = aisle_length · a / A`, `dz = level_height · l / L`.
pub fn depot_edge_secs(config: &WarehouseConfig, slot: Slot, demand_factor: f64) -> f64 {
    let (dx, dz) = depot_offsets(config, slot);
    adjusted_travel_time(dx, dz, config.accel_x, config.accel_z, 1.0, demand_factor)
}

/// Fail with [`TopologyError::Disconnected`] for the first storage node (in
/// id order) that has no directed path to the depot.
///
/// Runs one reverse breadth-first search from the depot: O(V + E).
pub fn validate_connectivity(graph: &WarehouseGraph) -> TopologyResult<()> {
    let n = graph.node_count();

    // Incoming adjacency, built once from the CSR edge arrays.
    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (from, to) in graph.edge_from.iter().zip(&graph.edge_to) {
        incoming[to.index()].push(from.index());
    }

    let mut reaches_depot = vec![false; n];
    let mut queue = VecDeque::new();
    let depot = graph.depot().index();
    reaches_depot[depot] = true;
    queue.push_back(depot);

    while let Some(node) = queue.pop_front() {
        for &pred in &incoming[node] {
            if !reaches_depot[pred] {
                reaches_depot[pred] = true;
                queue.push_back(pred);
            }
        }
    }

    for node in graph.storage_nodes() {
        if !reaches_depot[node.index()] {
            let slot = graph.slot_of(node).ok_or(TopologyError::NodeNotFound(node))?;
            return Err(TopologyError::Disconnected { slot });
        }
    }
    Ok(())
}

// ── Edge generation ───────────────────────────────────────────────────────────

fn add_grid_edges(
    b:       &mut WarehouseGraphBuilder,
    config:  &WarehouseConfig,
    heatmap: Option<&DemandHeatmap>,
) -> TopologyResult<()> {
    let vertical_secs   = config.level_height_m / config.speed_z;
    let horizontal_secs = config.aisle_length_m / config.speed_x;
    let top = config.levels - 1;

    for aisle in 0..config.aisles {
        for level in 0..config.levels {
            let here = b.storage_node(Slot::new(aisle, level));

            if level + 1 < config.levels {
                let up = b.storage_node(Slot::new(aisle, level + 1));
                b.add_link(here, up, vertical_secs, config.level_height_m)?;
            }

            if aisle + 1 < config.aisles && (level == 0 || level == top) {
                let next = b.storage_node(Slot::new(aisle + 1, level));
                b.add_link(here, next, horizontal_secs, config.aisle_length_m)?;
            }
        }
    }

    let depot = b.depot();
    for aisle in 0..config.aisles {
        for level in boundary_levels(config.levels) {
            let slot = Slot::new(aisle, level);
            let node = b.storage_node(slot);
            let (secs, length) = depot_edge(config, slot, heatmap);
            b.add_link(node, depot, secs, length)?;
        }
    }
    Ok(())
}

fn add_direct_edges(
    b:       &mut WarehouseGraphBuilder,
    config:  &WarehouseConfig,
    heatmap: Option<&DemandHeatmap>,
) -> TopologyResult<()> {
    let depot = b.depot();
    for aisle in 0..config.aisles {
        for level in 0..config.levels {
            let slot = Slot::new(aisle, level);
            let node = b.storage_node(slot);
            let (secs, length) = depot_edge(config, slot, heatmap);
            b.add_link(node, depot, secs, length)?;
        }
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn depot_edge(config: &WarehouseConfig, slot: Slot, heatmap: Option<&DemandHeatmap>) -> (f64, f64) {
    let factor = heatmap.map_or(1.0, |h| h.factor(slot));
    let (dx, dz) = depot_offsets(config, slot);
    (depot_edge_secs(config, slot, factor), dx + dz)
}

fn depot_offsets(config: &WarehouseConfig, slot: Slot) -> (f64, f64) {
    let dx = config.aisle_length_m * (slot.aisle as f64 / config.aisles as f64);
    let dz = config.level_height_m * (slot.level as f64 / config.levels as f64);
    (dx, dz)
}

/// First and last level, deduplicated for single-level racks.
fn boundary_levels(levels: u32) -> impl Iterator<Item = u32> {
    let top = levels - 1;
    std::iter::once(0).chain((top > 0).then_some(top))
}

fn estimated_edges(config: &WarehouseConfig) -> usize {
    let (a, l) = (config.aisles as usize, config.levels as usize);
    match config.mode {
        TopologyMode::Grid   => 2 * (a * l.saturating_sub(1) + 2 * a.saturating_sub(1) + 2 * a),
        TopologyMode::Direct => 2 * a * l,
    }
}
