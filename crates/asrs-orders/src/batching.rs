//! Greedy proximity batching.
//!
//! # Algorithm
//!
//! ```text
//! drop (and report) every order whose target the depot cannot reach
//! while orders remain:
//!     seed = next order in input order
//!     if seed cannot get back to the depot: drop it, try the next one
//!     batch = [seed]
//!     while |batch| < B and orders remain:
//!         d = distance from batch.last() to every node
//!         append the remaining order with the smallest finite d
//!                (first in input order on ties)
//!         if none is finite, fall back to the earlier anchors, newest first
//! ```
//!
//! Distance is the hop count by default and weighted seconds under
//! [`ProximityMetric::Seconds`].  One single-source search per anchor keeps
//! the cost at O(n · (E log V)) instead of a query per candidate pair.
//!
//! Every kept seed can return to the depot, and the depot reaches every kept
//! order, so a kept order is never stranded by the anchor it follows.  `n`
//! routable orders always produce `ceil(n / B)` batches, all full except
//! possibly the last.

use std::collections::VecDeque;

use tracing::warn;

use asrs_core::{NodeId, ProximityMetric, WorkloadConfig};
use asrs_topology::{BlockedNodes, Router, TopologyResult, WarehouseGraph, hop_distances};

use crate::{Order, OrderError, OrderResult, prioritize};

/// A group of orders dispatched back to back.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub index:  u32,
    pub orders: Vec<Order>,
}

/// An order dropped because routing failed around `anchor`: either no path
/// leads from `anchor` (the depot) to the order, or the order is `anchor`
/// itself and cannot get back to the depot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkippedOrder {
    pub order:  Order,
    pub anchor: NodeId,
}

/// Output of batching: the batches in dispatch order plus dropped orders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchPlan {
    pub batches: Vec<Batch>,
    pub skipped: Vec<SkippedOrder>,
}

impl BatchPlan {
    /// One batch per order, preserving input order.  No routing is done.
    pub fn singletons(orders: Vec<Order>) -> Self {
        let batches = orders
            .into_iter()
            .enumerate()
            .map(|(i, o)| Batch { index: i as u32, orders: vec![o] })
            .collect();
        Self { batches, skipped: Vec::new() }
    }

    /// Total number of batched (non-skipped) orders.
    pub fn order_count(&self) -> usize {
        self.batches.iter().map(|b| b.orders.len()).sum()
    }

    /// Flatten to `(batch index, order)` in dispatch order.
    pub fn dispatch_sequence(&self) -> impl Iterator<Item = (u32, Order)> + '_ {
        self.batches
            .iter()
            .flat_map(|b| b.orders.iter().map(move |&o| (b.index, o)))
    }
}

/// Group `orders` into batches of at most `batch_size` by path proximity.
pub fn batch_by_proximity<R: Router>(
    graph:      &WarehouseGraph,
    router:     &R,
    orders:     Vec<Order>,
    batch_size: usize,
    metric:     ProximityMetric,
    blocked:    &BlockedNodes,
) -> OrderResult<BatchPlan> {
    if batch_size == 0 {
        return Err(OrderError::InvalidBatchSize(batch_size));
    }
    if batch_size == 1 {
        return Ok(BatchPlan::singletons(orders));
    }

    let distances = |from: NodeId| -> TopologyResult<Vec<f64>> {
        match metric {
            ProximityMetric::Hops => hop_distances(graph, from, blocked),
            ProximityMetric::Seconds => router.distances_from(graph, from, blocked),
        }
    };

    let depot = graph.depot();
    let mut plan = BatchPlan::default();

    let from_depot = distances(depot)?;
    let mut remaining: VecDeque<Order> = VecDeque::with_capacity(orders.len());
    for o in orders {
        if from_depot[o.target.index()].is_finite() {
            remaining.push_back(o);
        } else {
            warn!(order = %o.id, slot = %o.slot, "no path from the depot; order skipped");
            plan.skipped.push(SkippedOrder { order: o, anchor: depot });
        }
    }

    while let Some(seed) = remaining.pop_front() {
        let seed_dist = distances(seed.target)?;
        if !seed_dist[depot.index()].is_finite() {
            warn!(order = %seed.id, slot = %seed.slot, "no path back to the depot; order skipped");
            plan.skipped.push(SkippedOrder { order: seed, anchor: seed.target });
            continue;
        }

        let mut batch = vec![seed];
        // Distance rows of the batch members, oldest first.
        let mut anchors = vec![seed_dist];

        while batch.len() < batch_size && !remaining.is_empty() {
            let Some(i) = anchors.iter().rev().find_map(|dist| nearest(&remaining, dist)) else {
                break;
            };
            let Some(next) = remaining.remove(i) else { break };
            if batch.len() + 1 < batch_size {
                anchors.push(distances(next.target)?);
            }
            batch.push(next);
        }

        plan.batches.push(Batch { index: plan.batches.len() as u32, orders: batch });
    }

    Ok(plan)
}

/// Index of the closest order in `remaining` with a finite distance, first
/// in queue order on ties.
fn nearest(remaining: &VecDeque<Order>, dist: &[f64]) -> Option<usize> {
    remaining
        .iter()
        .enumerate()
        .filter(|(_, o)| dist[o.target.index()].is_finite())
        .min_by(|(ia, a), (ib, b)| {
            dist[a.target.index()]
                .total_cmp(&dist[b.target.index()])
                .then(ia.cmp(ib))
        })
        .map(|(i, _)| i)
}

/// Apply the configured dispatch policies in order: priority, then batching.
pub fn plan_dispatch<R: Router>(
    graph:    &WarehouseGraph,
    router:   &R,
    orders:   Vec<Order>,
    workload: &WorkloadConfig,
    blocked:  &BlockedNodes,
) -> OrderResult<BatchPlan> {
    let orders = if workload.prioritize { prioritize(orders) } else { orders };
    batch_by_proximity(graph, router, orders, workload.batch_size, workload.batch_metric, blocked)
}
