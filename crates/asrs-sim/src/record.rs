//! Simulation output: the transaction log and the issue log.

use std::fmt;

use asrs_core::{NodeId, OrderId, RobotId, Slot, TxnId};

// ── TransactionRecord ─────────────────────────────────────────────────────────

/// One successfully dispatched order.  Never modified after it is appended.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransactionRecord {
    pub id:              TxnId,
    pub order:           OrderId,
    /// Index of the batch the order was dispatched in.
    pub batch:           u32,
    pub robot:           RobotId,
    pub start_node:      NodeId,
    pub target:          NodeId,
    pub slot:            Slot,
    /// Movement plus extraction, seconds.  Excludes congestion delay.
    pub travel_secs:     f64,
    pub extraction_secs: f64,
    pub delay_secs:      f64,
    /// Earlier transactions at the same storage node.
    pub overlap_count:   u32,
    /// `travel_secs + delay_secs`.
    pub total_secs:      f64,
    /// Metres travelled on the outbound and return legs.
    pub distance_m:      f64,
    pub dispatched_at:   f64,
    pub completed_at:    f64,
}

impl TransactionRecord {
    /// Seconds spent moving, i.e. travel without extraction.
    pub fn movement_secs(&self) -> f64 {
        self.travel_secs - self.extraction_secs
    }
}

// ── SimIssue ──────────────────────────────────────────────────────────────────

/// Why an order did not produce a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IssueKind {
    /// No route to the target or back to the depot.
    NoPath,
    /// A route existed but broke the movement rules.
    IllegalPath,
    /// No route while nodes were blocked.
    RerouteFailed,
    /// Dropped by proximity batching before dispatch.
    Unbatched,
    /// The run had nothing to dispatch.
    NoOrders,
}

/// A recoverable problem recorded during a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimIssue {
    pub kind:    IssueKind,
    pub order:   Option<OrderId>,
    pub robot:   Option<RobotId>,
    pub message: String,
}

impl SimIssue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self { kind, order: None, robot: None, message: message.into() }
    }

    pub fn for_order(mut self, order: OrderId) -> Self {
        self.order = Some(order);
        self
    }

    pub fn for_robot(mut self, robot: RobotId) -> Self {
        self.robot = Some(robot);
        self
    }
}

impl fmt::Display for SimIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ── SimOutcome ────────────────────────────────────────────────────────────────

/// Everything a finished run produced.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimOutcome {
    /// Records in dispatch order.
    pub records:     Vec<TransactionRecord>,
    pub issues:      Vec<SimIssue>,
    /// Successful assignments per robot, indexed by `RobotId`.
    pub assignments: Vec<u32>,
}

impl SimOutcome {
    pub fn skipped(&self) -> usize {
        self.issues.iter().filter(|i| i.order.is_some()).count()
    }
}
