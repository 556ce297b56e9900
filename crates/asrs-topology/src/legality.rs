//! Movement-rule check for computed paths.
//!
//! A legal path never moves diagonally and only changes aisle on the first or
//! last level.  Hops into or out of the depot are exempt: the depot is not
//! part of the aisle/level grid.
//!
//! The router only follows edges the topology builder created, so a legal
//! graph yields legal paths.  Callers re-check anyway, because a custom
//! [`Router`](crate::Router) or a hand-built graph may not honour the rules.

use asrs_core::{Node, NodeId};

use crate::{TopologyError, TopologyResult, WarehouseGraph};

/// Check every consecutive pair of `nodes`.
///
/// Fails with [`TopologyError::IllegalMove`] at the first offending hop, or
/// [`TopologyError::NodeNotFound`] for an id outside the graph.  Repeated
/// nodes (as at the join of an outbound and a return leg) are legal.
pub fn validate_path(graph: &WarehouseGraph, nodes: &[NodeId]) -> TopologyResult<()> {
    for pair in nodes.windows(2) {
        let from = graph.node(pair[0]).ok_or(TopologyError::NodeNotFound(pair[0]))?;
        let to   = graph.node(pair[1]).ok_or(TopologyError::NodeNotFound(pair[1]))?;
        check_move(from, to, graph.levels)?;
    }
    Ok(())
}

/// `true` if [`validate_path`] succeeds.
pub fn is_legal_path(graph: &WarehouseGraph, nodes: &[NodeId]) -> bool {
    validate_path(graph, nodes).is_ok()
}

fn check_move(from: Node, to: Node, levels: u32) -> TopologyResult<()> {
    let (Node::Storage(a), Node::Storage(b)) = (from, to) else {
        return Ok(());
    };
    let aisle_changed = a.aisle != b.aisle;
    let level_changed = a.level != b.level;

    if aisle_changed && level_changed {
        return Err(TopologyError::IllegalMove { from, to });
    }
    if aisle_changed && !a.is_boundary_level(levels) {
        return Err(TopologyError::IllegalMove { from, to });
    }
    Ok(())
}
