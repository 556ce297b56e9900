//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! `asrs-sim` and the proximity batcher call routing via the [`Router`]
//! trait, so applications can swap in A* or a congestion-aware router
//! without touching the simulator.  [`DijkstraRouter`] is the default.
//!
//! # Blocked nodes
//!
//! Every query takes a [`BlockedNodes`] set.  Blocked nodes are skipped
//! during relaxation; a blocked source or target means there is no path.
//!
//! # Cost units
//!
//! Edge weights and totals are seconds (`f64`).  The priority queue orders by
//! `f64::total_cmp` with `NodeId` as the secondary key for deterministic
//! tie-breaking.  [`hop_distances`] ignores weights and counts edges instead.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use asrs_core::{EdgeId, NodeId};

use crate::{BlockedNodes, TopologyError, TopologyResult, WarehouseGraph};

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Nodes in travel order, both endpoints included.
    pub nodes: Vec<NodeId>,
    /// Sum of edge weights, seconds.
    pub total_secs: f64,
    /// Sum of edge lengths, metres.
    pub length_m: f64,
}

impl Path {
    /// Zero-length path that stays on `node`.
    pub fn stationary(node: NodeId) -> Self {
        Self { nodes: vec![node], total_secs: 0.0, length_m: 0.0 }
    }

    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// `true` if source and target are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implementations must be `Send + Sync` so one router can serve parallel
/// scenario sweeps.
pub trait Router: Send + Sync {
    /// Minimum-weight path from `from` to `to` avoiding `blocked`.
    ///
    /// `from == to` yields a trivial path rather than an error.  Fails with
    /// [`TopologyError::NoPath`] when the endpoints are disconnected in the
    /// blocked view.
    fn route(
        &self,
        graph:   &WarehouseGraph,
        from:    NodeId,
        to:      NodeId,
        blocked: &BlockedNodes,
    ) -> TopologyResult<Path>;

    /// Seconds from `from` to every node (`f64::INFINITY` if unreachable).
    ///
    /// One call answers many "how far is X from here" questions at once; the
    /// proximity batcher depends on this to avoid a query per candidate.
    fn distances_from(
        &self,
        graph:   &WarehouseGraph,
        from:    NodeId,
        blocked: &BlockedNodes,
    ) -> TopologyResult<Vec<f64>>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        graph:   &WarehouseGraph,
        from:    NodeId,
        to:      NodeId,
        blocked: &BlockedNodes,
    ) -> TopologyResult<Path> {
        check_node(graph, from)?;
        check_node(graph, to)?;
        if blocked.contains(from) || blocked.contains(to) {
            return Err(TopologyError::NoPath { from, to });
        }
        if from == to {
            return Ok(Path::stationary(from));
        }

        let search = dijkstra(graph, from, Some(to), blocked);
        if search.dist[to.index()].is_infinite() {
            return Err(TopologyError::NoPath { from, to });
        }
        Ok(reconstruct(graph, &search, to))
    }

    fn distances_from(
        &self,
        graph:   &WarehouseGraph,
        from:    NodeId,
        blocked: &BlockedNodes,
    ) -> TopologyResult<Vec<f64>> {
        check_node(graph, from)?;
        if blocked.contains(from) {
            return Ok(vec![f64::INFINITY; graph.node_count()]);
        }
        Ok(dijkstra(graph, from, None, blocked).dist)
    }
}

/// Shortest path with the default [`DijkstraRouter`].
pub fn route(
    graph:   &WarehouseGraph,
    from:    NodeId,
    to:      NodeId,
    blocked: &BlockedNodes,
) -> TopologyResult<Path> {
    DijkstraRouter.route(graph, from, to, blocked)
}

/// Unweighted edge count from `from` to every node, as `f64` so it lines up
/// with [`Router::distances_from`].  Unreachable nodes are `f64::INFINITY`.
///
/// Breadth-first, O(V + E).  Blocked nodes are never entered; a blocked
/// source reaches nothing.
pub fn hop_distances(
    graph:   &WarehouseGraph,
    from:    NodeId,
    blocked: &BlockedNodes,
) -> TopologyResult<Vec<f64>> {
    check_node(graph, from)?;
    let mut dist = vec![f64::INFINITY; graph.node_count()];
    if blocked.contains(from) {
        return Ok(dist);
    }

    dist[from.index()] = 0.0;
    let mut queue = VecDeque::from([from]);
    while let Some(node) = queue.pop_front() {
        let next = dist[node.index()] + 1.0;
        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            if blocked.contains(neighbor) || dist[neighbor.index()].is_finite() {
                continue;
            }
            dist[neighbor.index()] = next;
            queue.push_back(neighbor);
        }
    }
    Ok(dist)
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap entry ordered so `BinaryHeap` (a max-heap) pops the cheapest first.
#[derive(Copy, Clone, PartialEq)]
struct Frontier {
    cost: f64,
    node: NodeId,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Search {
    dist:      Vec<f64>,
    prev_edge: Vec<EdgeId>,
}

/// Run Dijkstra from `from`.  Stops early once `target` is settled.
fn dijkstra(
    graph:   &WarehouseGraph,
    from:    NodeId,
    target:  Option<NodeId>,
    blocked: &BlockedNodes,
) -> Search {
    let n = graph.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];
    dist[from.index()] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(Frontier { cost: 0.0, node: from });

    while let Some(Frontier { cost, node }) = heap.pop() {
        if Some(node) == target {
            break;
        }
        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            if blocked.contains(neighbor) {
                continue;
            }
            let new_cost = cost + graph.edge_secs[edge.index()];
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Frontier { cost: new_cost, node: neighbor });
            }
        }
    }

    Search { dist, prev_edge }
}

fn reconstruct(graph: &WarehouseGraph, search: &Search, to: NodeId) -> Path {
    let mut nodes = vec![to];
    let mut length_m = 0.0;
    let mut cur = to;
    loop {
        let e = search.prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        length_m += graph.edge_length_m[e.index()];
        cur = graph.edge_from[e.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    Path {
        nodes,
        total_secs: search.dist[to.index()],
        length_m,
    }
}

fn check_node(graph: &WarehouseGraph, node: NodeId) -> TopologyResult<()> {
    if graph.contains(node) {
        Ok(())
    } else {
        Err(TopologyError::NodeNotFound(node))
    }
}
