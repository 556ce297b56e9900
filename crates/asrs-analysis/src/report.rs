//! The structured report handed to presentation layers.

use asrs_core::SimConfig;
use asrs_sim::{SimIssue, SimOutcome, TransactionRecord};

use crate::{FleetKpis, OverlapSummary, analyze_overlaps, fleet_kpis};

/// Everything one run produced, plus its derived summaries.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationReport {
    pub kpis:     FleetKpis,
    pub overlaps: OverlapSummary,
    pub records:  Vec<TransactionRecord>,
    pub issues:   Vec<SimIssue>,
}

impl SimulationReport {
    pub fn new(outcome: SimOutcome, config: &SimConfig) -> Self {
        let kpis     = fleet_kpis(&outcome.records, &outcome.assignments, config);
        let overlaps = analyze_overlaps(&outcome.records, config.cost.delay_cost_per_sec);
        Self { kpis, overlaps, records: outcome.records, issues: outcome.issues }
    }

    pub fn average_transaction_secs(&self) -> f64 {
        self.kpis.average_transaction_secs
    }

    pub fn throughput_per_hour(&self) -> f64 {
        self.kpis.throughput_per_hour
    }

    pub fn shift_transactions(&self) -> f64 {
        self.kpis.shift_transactions
    }

    pub fn cost_per_transaction(&self) -> Option<f64> {
        self.kpis.cost_per_transaction
    }

    /// Orders that were dropped or skipped.
    pub fn skipped_orders(&self) -> usize {
        self.issues.iter().filter(|i| i.order.is_some()).count()
    }

    /// One human-readable line per issue.
    pub fn issue_messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}
