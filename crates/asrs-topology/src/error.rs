//! Topology-subsystem error type.

use thiserror::Error;

use asrs_core::{CoreError, Node, NodeId, Slot};

/// Errors produced by `asrs-topology`.
///
/// `NoPath` and `IllegalMove` are per-query conditions that the simulator
/// records and moves past.  Everything else means the graph itself is unusable.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("illegal move {from} -> {to}")]
    IllegalMove { from: Node, to: Node },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("storage slot {slot} cannot reach the depot")]
    Disconnected { slot: Slot },

    #[error("edge {from} -> {to} would be a self-loop")]
    SelfLoop { from: NodeId, to: NodeId },

    #[error("edge {from} -> {to} has invalid weight {weight}")]
    InvalidWeight { from: NodeId, to: NodeId, weight: f64 },

    #[error(transparent)]
    Config(#[from] CoreError),
}

impl TopologyError {
    /// `true` for failures scoped to a single route query.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TopologyError::NoPath { .. } | TopologyError::IllegalMove { .. })
    }
}

pub type TopologyResult<T> = Result<T, TopologyError>;
