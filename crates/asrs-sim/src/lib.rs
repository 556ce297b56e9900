//! `asrs-sim` — the multi-robot transaction simulator.
//!
//! # Dispatch loop
//!
//! ```text
//! for (batch, order) in plan.dispatch_sequence():
//!   ① Select   — round-robin cursor or earliest-available robot.
//!   ② Route    — path_out = robot.position → target,
//!                path_back = target → depot, both avoiding blocked nodes.
//!   ③ Validate — movement rules on path_out ++ path_back.
//!                NoPath / IllegalMove → SimIssue, order skipped.
//!   ④ Time     — travel = path seconds (or node count in Direct mode)
//!                × traffic + extraction; delay = overlap × jitter × traffic.
//!   ⑤ Commit   — robot returns to the depot, available_at advances,
//!                TransactionRecord appended.
//! ```
//!
//! Only graph-level failures (unknown node ids) abort a run; everything
//! scoped to one order lands in the issue log.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                    |
//! |-----------|-----------------------------------------------------------|
//! | `fx-hash` | FxHash for the overlap index and `BlockedNodes`.          |
//! | `serde`   | Derives `Serialize`/`Deserialize` on records and issues.  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use asrs_sim::{NoopObserver, SimBuilder};
//! use asrs_topology::DijkstraRouter;
//!
//! let mut sim = SimBuilder::new(config, graph, DijkstraRouter)
//!     .plan(plan)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! let outcome = sim.into_outcome();
//! ```

pub mod builder;
pub mod congestion;
pub mod error;
pub mod fleet;
pub mod observer;
pub mod record;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use congestion::CongestionModel;
pub use error::{SimError, SimResult};
pub use fleet::{Fleet, Robot};
pub use observer::{NoopObserver, SimObserver};
pub use record::{IssueKind, SimIssue, SimOutcome, TransactionRecord};
pub use sim::{Sim, StepOutcome};
