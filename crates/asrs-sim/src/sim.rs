//! The `Sim` struct and its dispatch loop.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use asrs_core::{NodeId, RobotId, SimConfig, TopologyMode, TxnId, clamp_factor};
use asrs_orders::Order;
use asrs_topology::{BlockedNodes, Path, Router, TopologyError, TopologyResult, WarehouseGraph, validate_path};

use crate::{
    CongestionModel, Fleet, IssueKind, SimIssue, SimObserver, SimOutcome, SimResult,
    TransactionRecord,
};

// ── Per-order routing result ──────────────────────────────────────────────────

/// Outbound and return legs of one order, already checked for legality.
struct Trip {
    out:  Path,
    back: Path,
}

/// What a single [`Sim::step`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Dispatched(TransactionRecord),
    Skipped(SimIssue),
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The transaction simulator.
///
/// Holds the graph, the fleet, the pending dispatch queue and the growing
/// output logs.  Orders are processed strictly in queue order; robot
/// concurrency is modelled through each robot's `available_at` timestamp.
///
/// The simulated clock is the dispatch time of the latest order.  An order
/// starts at `max(clock, robot.available_at)`, so dispatch times never go
/// backwards.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<R: Router> {
    /// Configuration the run was validated against.
    pub config: SimConfig,

    /// Read-only warehouse graph shared by every route query.
    pub graph: WarehouseGraph,

    pub(crate) router:     R,
    pub(crate) fleet:      Fleet,
    pub(crate) congestion: CongestionModel,

    /// Nodes excluded from routing for all subsequent orders.
    pub(crate) blocked: BlockedNodes,

    /// `(batch index, order)` pairs still to dispatch.
    pub(crate) queue: VecDeque<(u32, Order)>,

    pub(crate) clock:   f64,
    pub(crate) outcome: SimOutcome,

    /// Number of issues already handed to an observer.
    pub(crate) reported: usize,
}

impl<R: Router> Sim<R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Dispatch every remaining order.
    ///
    /// Per-order failures are logged as issues and the run continues; only
    /// graph-level errors abort.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.step(observer)?.is_some() {}
        self.flush_issues(observer);
        self.outcome.assignments = self.fleet.assignment_counts();

        info!(
            records = self.outcome.records.len(),
            issues  = self.outcome.issues.len(),
            makespan_secs = self.fleet.horizon(),
            "simulation run complete"
        );
        observer.on_run_end(&self.outcome);
        Ok(())
    }

    /// Dispatch the next order.  Returns `Ok(None)` once the queue is empty.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Option<StepOutcome>> {
        self.flush_issues(observer);

        let Some((batch, order)) = self.queue.pop_front() else {
            return Ok(None);
        };
        let Some(robot) = self.fleet.select() else {
            return Ok(None);
        };
        let depot = self.graph.depot();
        let start = self.fleet.get(robot).map_or(depot, |r| r.position);

        match self.plan_trip(start, order.target) {
            Ok(trip) => {
                let record = self.commit(batch, order, robot, start, &trip);
                observer.on_dispatch(&record);
                Ok(Some(StepOutcome::Dispatched(record)))
            }
            Err(e) if e.is_recoverable() => {
                let issue = self.skip(order, robot, &e);
                self.flush_issues(observer);
                Ok(Some(StepOutcome::Skipped(issue)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Exclude `node` from routing for all orders dispatched from now on.
    ///
    /// Returns `false` if it was already blocked.
    pub fn block_node(&mut self, node: NodeId) -> SimResult<bool> {
        if !self.graph.contains(node) {
            return Err(TopologyError::NodeNotFound(node).into());
        }
        let inserted = self.blocked.insert(node);
        if inserted {
            debug!(node = %node, blocked = self.blocked.len(), "node blocked");
        }
        Ok(inserted)
    }

    /// Make `node` routable again.  Returns `false` if it was not blocked.
    pub fn unblock_node(&mut self, node: NodeId) -> bool {
        self.blocked.remove(node)
    }

    pub fn clear_blocked(&mut self) {
        self.blocked.clear();
    }

    pub fn blocked(&self) -> &BlockedNodes {
        &self.blocked
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    /// Orders not yet dispatched or skipped.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Dispatch time of the most recent order.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.outcome.records
    }

    pub fn issues(&self) -> &[SimIssue] {
        &self.outcome.issues
    }

    /// Consume the simulator and return its logs.
    pub fn into_outcome(mut self) -> SimOutcome {
        self.outcome.assignments = self.fleet.assignment_counts();
        self.outcome
    }

    // ── Dispatch internals ────────────────────────────────────────────────

    fn plan_trip(&self, start: NodeId, target: NodeId) -> TopologyResult<Trip> {
        let depot = self.graph.depot();
        let out  = self.router.route(&self.graph, start, target, &self.blocked)?;
        let back = self.router.route(&self.graph, target, depot, &self.blocked)?;

        let mut nodes = Vec::with_capacity(out.nodes.len() + back.nodes.len());
        nodes.extend_from_slice(&out.nodes);
        nodes.extend_from_slice(&back.nodes);
        validate_path(&self.graph, &nodes)?;

        Ok(Trip { out, back })
    }

    fn commit(
        &mut self,
        batch: u32,
        order: Order,
        robot: RobotId,
        start: NodeId,
        trip:  &Trip,
    ) -> TransactionRecord {
        let traffic = clamp_factor(self.config.workload.traffic_multiplier);
        let movement = match self.config.warehouse.mode {
            TopologyMode::Grid => (trip.out.total_secs + trip.back.total_secs) * traffic,
            TopologyMode::Direct => (trip.out.nodes.len() + trip.back.nodes.len()) as f64 * traffic,
        };
        let extraction = self.config.fleet.extraction_secs;
        let travel     = movement + extraction;

        let overlap = self.congestion.overlap(order.target);
        let delay   = self.congestion.delay(overlap);

        let available  = self.fleet.get(robot).map_or(0.0, |r| r.available_at);
        let dispatched = self.clock.max(available);
        let completed  = dispatched + travel + delay;
        self.clock = dispatched;

        let record = TransactionRecord {
            id:              TxnId(self.outcome.records.len() as u32),
            order:           order.id,
            batch,
            robot,
            start_node:      start,
            target:          order.target,
            slot:            order.slot,
            travel_secs:     travel,
            extraction_secs: extraction,
            delay_secs:      delay,
            overlap_count:   overlap,
            total_secs:      travel + delay,
            distance_m:      trip.out.length_m + trip.back.length_m,
            dispatched_at:   dispatched,
            completed_at:    completed,
        };

        self.congestion.record(order.target);
        self.fleet.commit(robot, self.graph.depot(), completed);
        self.outcome.records.push(record);

        debug!(
            txn = %record.id, order = %order.id, robot = %robot, slot = %order.slot,
            travel_secs = travel, delay_secs = delay, overlap,
            "order dispatched"
        );
        record
    }

    fn skip(&mut self, order: Order, robot: RobotId, err: &TopologyError) -> SimIssue {
        let kind = match err {
            TopologyError::IllegalMove { .. } => IssueKind::IllegalPath,
            _ if !self.blocked.is_empty() => IssueKind::RerouteFailed,
            _ => IssueKind::NoPath,
        };
        warn!(order = %order.id, robot = %robot, slot = %order.slot, ?kind, error = %err, "order skipped");

        let issue = SimIssue::new(
            kind,
            format!("order {} at slot {} skipped for {}: {}", order.id, order.slot, robot, err),
        )
        .for_order(order.id)
        .for_robot(robot);
        self.outcome.issues.push(issue.clone());
        issue
    }

    fn flush_issues<O: SimObserver>(&mut self, observer: &mut O) {
        for issue in &self.outcome.issues[self.reported..] {
            observer.on_issue(issue);
        }
        self.reported = self.outcome.issues.len();
    }
}
