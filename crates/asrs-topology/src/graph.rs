//! Warehouse graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_secs`, `edge_length_m`) are
//! sorted by source node and indexed by `EdgeId`, so iterating a node's
//! outgoing edges is a contiguous scan.
//!
//! # Node numbering
//!
//! Storage slot `(a, l)` is `NodeId(a * levels + l)`; the depot is the last
//! node, `NodeId(aisles * levels)`.  Slot ↔ id conversion is therefore pure
//! arithmetic and never needs a lookup table.

use asrs_core::{EdgeId, Node, NodeId, Slot};

use crate::{TopologyError, TopologyResult};

// ── WarehouseGraph ────────────────────────────────────────────────────────────

/// Directed, non-negatively weighted warehouse graph in CSR format.
///
/// Read-only once built.  Do not construct directly; use
/// [`WarehouseGraphBuilder`] or [`crate::build_warehouse`].
#[derive(Debug, Clone)]
pub struct WarehouseGraph {
    pub aisles: u32,
    pub levels: u32,

    /// What each node represents.  Indexed by `NodeId`.
    pub node_kind: Vec<Node>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source node of each edge (needed for path reconstruction).
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Traversal time in seconds.  Always finite and `>= 0`.
    pub edge_secs: Vec<f64>,

    /// Physical distance in metres, used for energy accounting.
    pub edge_length_m: Vec<f64>,
}

impl WarehouseGraph {
    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_kind.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn storage_node_count(&self) -> usize {
        self.aisles as usize * self.levels as usize
    }

    // ── Node lookup ───────────────────────────────────────────────────────

    #[inline]
    pub fn depot(&self) -> NodeId {
        NodeId(self.aisles.saturating_mul(self.levels))
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// Kind of `node`, or `None` if the id is out of range.
    #[inline]
    pub fn node(&self, node: NodeId) -> Option<Node> {
        self.node_kind.get(node.index()).copied()
    }

    /// `NodeId` of a storage slot, or `None` if the slot is outside the rack.
    #[inline]
    pub fn storage_node(&self, slot: Slot) -> Option<NodeId> {
        (slot.aisle < self.aisles && slot.level < self.levels)
            .then(|| NodeId(slot.aisle.saturating_mul(self.levels).saturating_add(slot.level)))
    }

    /// Slot of a storage node; `None` for the depot or unknown ids.
    #[inline]
    pub fn slot_of(&self, node: NodeId) -> Option<Slot> {
        self.node(node).and_then(Node::slot)
    }

    /// All storage node ids in ascending order.
    pub fn storage_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.aisles.saturating_mul(self.levels)).map(NodeId)
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// The first edge `from → to`, if one exists.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        if !self.contains(from) {
            return None;
        }
        self.out_edges(from).find(|e| self.edge_to[e.index()] == to)
    }
}

// ── WarehouseGraphBuilder ─────────────────────────────────────────────────────

/// Construct a [`WarehouseGraph`] incrementally, then call [`build`](Self::build).
///
/// All `aisles × levels` storage nodes and the depot exist from the start;
/// the builder only collects edges.  Edges are validated on insertion (no
/// self-loops, finite non-negative weight) so a built graph never violates
/// the edge invariants.
///
/// # Example
///
/// ```
/// use asrs_core::Slot;
/// use asrs_topology::WarehouseGraphBuilder;
///
/// let mut b = WarehouseGraphBuilder::new(2, 1);
/// let a = b.storage_node(Slot::new(0, 0));
/// let c = b.storage_node(Slot::new(1, 0));
/// b.add_link(a, c, 10.0, 10.0).unwrap();
/// let g = b.build();
/// assert_eq!(g.node_count(), 3); // two slots + depot
/// assert_eq!(g.edge_count(), 2);
/// ```
pub struct WarehouseGraphBuilder {
    aisles:    u32,
    levels:    u32,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    secs:     f64,
    length_m: f64,
}

impl WarehouseGraphBuilder {
    pub fn new(aisles: u32, levels: u32) -> Self {
        Self { aisles, levels, raw_edges: Vec::new() }
    }

    pub fn with_capacity(aisles: u32, levels: u32, edges: usize) -> Self {
        Self { aisles, levels, raw_edges: Vec::with_capacity(edges) }
    }

    pub fn node_count(&self) -> usize {
        self.aisles as usize * self.levels as usize + 1
    }

    pub fn edge_count(&self) -> usize {
        self.raw_edges.len()
    }

    pub fn depot(&self) -> NodeId {
        NodeId(self.aisles.saturating_mul(self.levels))
    }

    /// Id of `slot`.  The caller guarantees the slot lies inside the rack.
    #[inline]
    pub fn storage_node(&self, slot: Slot) -> NodeId {
        debug_assert!(slot.aisle < self.aisles && slot.level < self.levels);
        NodeId(slot.aisle.saturating_mul(self.levels).saturating_add(slot.level))
    }

    /// Add a **directed** edge from `from` to `to`.
    pub fn add_directed_edge(
        &mut self,
        from:     NodeId,
        to:       NodeId,
        secs:     f64,
        length_m: f64,
    ) -> TopologyResult<()> {
        let nodes = self.node_count();
        for n in [from, to] {
            if n.index() >= nodes {
                return Err(TopologyError::NodeNotFound(n));
            }
        }
        if from == to {
            return Err(TopologyError::SelfLoop { from, to });
        }
        if !(secs.is_finite() && secs >= 0.0) {
            return Err(TopologyError::InvalidWeight { from, to, weight: secs });
        }
        self.raw_edges.push(RawEdge { from, to, secs, length_m: length_m.max(0.0) });
        Ok(())
    }

    /// Convenience: add edges in **both directions** with the same weight.
    pub fn add_link(&mut self, a: NodeId, b: NodeId, secs: f64, length_m: f64) -> TopologyResult<()> {
        self.add_directed_edge(a, b, secs, length_m)?;
        self.add_directed_edge(b, a, secs, length_m)
    }

    /// Consume the builder and produce a [`WarehouseGraph`].
    ///
    /// The edge sort is stable, so edges out of one node keep their insertion
    /// order and routing tie-breaks stay reproducible.
    pub fn build(self) -> WarehouseGraph {
        let node_count = self.node_count();
        let edge_count = self.raw_edges.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:     Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_secs:     Vec<f64>    = raw.iter().map(|e| e.secs).collect();
        let edge_length_m: Vec<f64>    = raw.iter().map(|e| e.length_m).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let mut node_kind = Vec::with_capacity(node_count);
        for aisle in 0..self.aisles {
            for level in 0..self.levels {
                node_kind.push(Node::Storage(Slot::new(aisle, level)));
            }
        }
        node_kind.push(Node::Depot);

        WarehouseGraph {
            aisles: self.aisles,
            levels: self.levels,
            node_kind,
            node_out_start,
            edge_from,
            edge_to,
            edge_secs,
            edge_length_m,
        }
    }
}
