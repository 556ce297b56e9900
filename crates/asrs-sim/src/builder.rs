//! Fluent builder for constructing a [`Sim`].

use std::collections::VecDeque;

use tracing::warn;

use asrs_core::{SimConfig, SimRng, streams};
use asrs_orders::{BatchPlan, Order};
use asrs_topology::{BlockedNodes, Router, TopologyError, WarehouseGraph};

use crate::{CongestionModel, Fleet, IssueKind, Sim, SimIssue, SimOutcome, SimResult};

/// Fluent builder for [`Sim<R>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: fleet size, policy, extraction time, traffic, jitter, …
/// - [`WarehouseGraph`]: from [`asrs_topology::build_warehouse`]
/// - `R: Router`: e.g. [`asrs_topology::DijkstraRouter`]
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default                                         |
/// |------------------|-------------------------------------------------|
/// | `.plan(p)`       | Empty plan (the run logs a `NoOrders` issue)     |
/// | `.orders(v)`     | One single-order batch per order                 |
/// | `.blocked(b)`    | Nothing blocked                                  |
/// | `.jitter_rng(r)` | `SimRng::new(seed).child(streams::JITTER)`       |
pub struct SimBuilder<R: Router> {
    config:  SimConfig,
    graph:   WarehouseGraph,
    router:  R,
    plan:    Option<BatchPlan>,
    blocked: BlockedNodes,
    jitter:  Option<SimRng>,
}

impl<R: Router> SimBuilder<R> {
    pub fn new(config: SimConfig, graph: WarehouseGraph, router: R) -> Self {
        Self {
            config,
            graph,
            router,
            plan:    None,
            blocked: BlockedNodes::new(),
            jitter:  None,
        }
    }

    /// Dispatch the batches of `plan` in order.  Orders the batcher skipped
    /// are carried into the issue log as `Unbatched`.
    pub fn plan(mut self, plan: BatchPlan) -> Self {
        self.plan = Some(plan);
        self
    }

    /// Dispatch `orders` as given, without batching.
    pub fn orders(mut self, orders: Vec<Order>) -> Self {
        self.plan = Some(BatchPlan::singletons(orders));
        self
    }

    /// Nodes blocked from the first order on.
    pub fn blocked(mut self, blocked: BlockedNodes) -> Self {
        self.blocked = blocked;
        self
    }

    /// Random stream for congestion jitter.
    pub fn jitter_rng(mut self, rng: SimRng) -> Self {
        self.jitter = Some(rng);
        self
    }

    /// Validate the configuration and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<R>> {
        self.config.validate()?;

        let depot = self.graph.depot();
        for &node in &self.blocked.sorted() {
            if !self.graph.contains(node) {
                return Err(TopologyError::NodeNotFound(node).into());
            }
        }

        let plan = self.plan.unwrap_or_default();
        let mut outcome = SimOutcome::default();

        // ── Carry batching losses into the issue log ──────────────────────
        for skipped in &plan.skipped {
            outcome.issues.push(
                SimIssue::new(
                    IssueKind::Unbatched,
                    format!(
                        "order {} at slot {} dropped from batching: unroutable around {}",
                        skipped.order.id, skipped.order.slot, skipped.anchor
                    ),
                )
                .for_order(skipped.order.id),
            );
        }

        let queue: VecDeque<(u32, Order)> = plan.dispatch_sequence().collect();
        if queue.is_empty() {
            warn!("no orders to simulate");
            outcome.issues.push(SimIssue::new(IssueKind::NoOrders, "no orders to simulate"));
        }

        let jitter = self
            .jitter
            .unwrap_or_else(|| SimRng::new(self.config.workload.seed).child(streams::JITTER));
        let robots     = self.config.fleet.robot_count;
        let fleet      = Fleet::new(robots, depot, self.config.fleet.policy);
        let congestion = CongestionModel::new(&self.config.workload, robots, jitter);

        Ok(Sim {
            config:   self.config,
            graph:    self.graph,
            router:   self.router,
            fleet,
            congestion,
            blocked:  self.blocked,
            queue,
            clock:    0.0,
            outcome,
            reported: 0,
        })
    }
}
