//! Callbacks for progress reporting and data collection during a run.

use crate::{SimIssue, SimOutcome, TransactionRecord};

/// Hooks invoked by [`Sim::step`][crate::Sim::step] and
/// [`Sim::run`][crate::Sim::run].
///
/// All methods default to no-ops.
///
/// # Example — delay printer
///
/// ```rust,ignore
/// struct DelayPrinter;
///
/// impl SimObserver for DelayPrinter {
///     fn on_dispatch(&mut self, record: &TransactionRecord) {
///         if record.overlap_count > 0 {
///             println!("{}: +{:.1}s at {}", record.id, record.delay_secs, record.slot);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called after each record is appended.
    fn on_dispatch(&mut self, _record: &TransactionRecord) {}

    /// Called once for every issue, in the order they were logged.
    fn on_issue(&mut self, _issue: &SimIssue) {}

    /// Called once when `run` has drained the dispatch queue.
    fn on_run_end(&mut self, _outcome: &SimOutcome) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
