//! Congestion aggregation over the transaction log.

use std::collections::BTreeMap;

use asrs_sim::TransactionRecord;

/// Congestion totals for one aisle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AisleOverlap {
    pub overlaps:   u64,
    pub delay_secs: f64,
    pub cost:       f64,
}

/// Congestion totals for one run.  Recomputed from the log on every call.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlapSummary {
    pub total_overlaps:     u64,
    pub total_delay_secs:   f64,
    /// Delay per overlap event; 0 when there were none.
    pub average_delay_secs: f64,
    pub total_delay_cost:   f64,
    /// Only aisles with at least one overlapping transaction appear.
    pub per_aisle:          BTreeMap<u32, AisleOverlap>,
}

/// Reduce `records` to congestion totals, pricing delay at
/// `delay_cost_per_sec`.
pub fn analyze_overlaps(records: &[TransactionRecord], delay_cost_per_sec: f64) -> OverlapSummary {
    let mut summary = OverlapSummary::default();

    for r in records.iter().filter(|r| r.overlap_count > 0) {
        let cost = r.delay_secs * delay_cost_per_sec;
        summary.total_overlaps   += u64::from(r.overlap_count);
        summary.total_delay_secs += r.delay_secs;
        summary.total_delay_cost += cost;

        let aisle = summary.per_aisle.entry(r.slot.aisle).or_default();
        aisle.overlaps   += u64::from(r.overlap_count);
        aisle.delay_secs += r.delay_secs;
        aisle.cost       += cost;
    }

    if summary.total_overlaps > 0 {
        summary.average_delay_secs = summary.total_delay_secs / summary.total_overlaps as f64;
    }
    summary
}
