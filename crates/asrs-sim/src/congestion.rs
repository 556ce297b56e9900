//! Same-rack contention model.
//!
//! The overlap count of an order is the number of earlier successful
//! transactions that targeted the same storage node.  Each overlap costs a
//! jittered delay drawn from `[jitter_min, jitter_max]`, scaled by the
//! (clamped) traffic multiplier.  A single-robot fleet never contends with
//! itself, so overlap and delay are both zero there.

use asrs_core::{NodeId, SimRng, WorkloadConfig, clamp_factor};

#[cfg(feature = "fx-hash")]
type VisitMap = rustc_hash::FxHashMap<NodeId, u32>;
#[cfg(not(feature = "fx-hash"))]
type VisitMap = std::collections::HashMap<NodeId, u32>;

pub struct CongestionModel {
    enabled:    bool,
    jitter_min: f64,
    jitter_max: f64,
    traffic:    f64,
    rng:        SimRng,
    visits:     VisitMap,
}

impl CongestionModel {
    /// Active only when `workload.congestion` is set and the fleet has more
    /// than one robot.
    pub fn new(workload: &WorkloadConfig, robot_count: u32, rng: SimRng) -> Self {
        Self {
            enabled:    workload.congestion && robot_count > 1,
            jitter_min: workload.delay_jitter_min_secs,
            jitter_max: workload.delay_jitter_max_secs,
            traffic:    clamp_factor(workload.traffic_multiplier),
            rng,
            visits:     VisitMap::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Prior transactions at `target`; always 0 when disabled.
    pub fn overlap(&self, target: NodeId) -> u32 {
        if !self.enabled {
            return 0;
        }
        self.visits.get(&target).copied().unwrap_or(0)
    }

    /// Delay for `overlap` contending transactions.
    ///
    /// Draws from the jitter stream only when `overlap > 0`, so runs without
    /// contention leave the stream untouched.
    pub fn delay(&mut self, overlap: u32) -> f64 {
        if !self.enabled || overlap == 0 {
            return 0.0;
        }
        let unit = self.rng.uniform(self.jitter_min, self.jitter_max);
        overlap as f64 * unit * self.traffic
    }

    /// Count a completed transaction at `target`.
    pub fn record(&mut self, target: NodeId) {
        *self.visits.entry(target).or_insert(0) += 1;
    }
}
