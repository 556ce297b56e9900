//! Run configuration.
//!
//! A [`SimConfig`] bundles everything one simulation run needs: the physical
//! warehouse, the shuttle fleet, the workload and the cost rates.  Every part
//! implements `Default` with the reference installation's values (10 aisles ×
//! 5 levels, 30 m aisles, one robot, 2 s extraction, …) so callers override
//! only what they study.
//!
//! Call [`SimConfig::validate`] before building anything; it rejects inputs
//! that would otherwise surface later as division faults or empty fleets.

use crate::{CoreError, CoreResult};

// ── Enumerated choices ────────────────────────────────────────────────────────

/// How storage nodes are wired together.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TopologyMode {
    /// Vertical lifts in every aisle, transfer cars on the first and last
    /// level, depot reachable from boundary levels only.
    #[default]
    Grid,
    /// Every storage node links straight to the depot.  Coarse studies only.
    Direct,
}

/// Which robot takes the next order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AssignmentPolicy {
    /// Cycle through robot indices regardless of availability.
    #[default]
    RoundRobin,
    /// Robot with the smallest available-at time; ties go to the lowest index.
    EarliestAvailable,
}

/// When the per-robot speed-upgrade surcharge applies.
///
/// Two installations priced the upgrade differently; both rules are kept as
/// configuration rather than folded into one.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UpgradeRule {
    /// Explicit switch.  An upgraded fleet also moves at
    /// [`FleetConfig::upgraded_speed`] on both axes.
    Toggle(bool),
    /// Surcharge applies when the extraction time is below this many seconds.
    /// Speeds are unchanged.
    ExtractionBelow(f64),
}

/// Distance used to rank batch candidates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProximityMetric {
    /// Fewest edges, ignoring edge weights.
    #[default]
    Hops,
    /// Shortest weighted path, seconds.
    Seconds,
}

impl Default for UpgradeRule {
    fn default() -> Self {
        UpgradeRule::Toggle(false)
    }
}

// ── Warehouse ─────────────────────────────────────────────────────────────────

/// Physical layout and shuttle kinematics.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WarehouseConfig {
    pub aisles:         u32,
    pub levels:         u32,
    /// Metres between adjacent aisles along a transfer level.
    pub aisle_length_m: f64,
    /// Metres between adjacent levels.
    pub level_height_m: f64,
    /// Horizontal speed, m/s.
    pub speed_x:        f64,
    /// Vertical speed, m/s.
    pub speed_z:        f64,
    /// Horizontal acceleration, m/s².
    pub accel_x:        f64,
    /// Vertical acceleration, m/s².
    pub accel_z:        f64,
    pub mode:           TopologyMode,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            aisles:         10,
            levels:         5,
            aisle_length_m: 30.0,
            level_height_m: 5.0,
            speed_x:        1.0,
            speed_z:        1.0,
            accel_x:        0.5,
            accel_z:        0.5,
            mode:           TopologyMode::Grid,
        }
    }
}

impl WarehouseConfig {
    /// Number of storage nodes (`aisles × levels`).
    pub fn slot_count(&self) -> usize {
        self.aisles as usize * self.levels as usize
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.aisles == 0 {
            return Err(CoreError::config("warehouse.aisles", "must be at least 1"));
        }
        if self.levels == 0 {
            return Err(CoreError::config("warehouse.levels", "must be at least 1"));
        }
        // Node ids are u32 and the depot takes id `aisles × levels`, which
        // must stay below the `NodeId::INVALID` sentinel.
        match self.aisles.checked_mul(self.levels) {
            Some(slots) if slots < u32::MAX => {}
            _ => {
                return Err(CoreError::config(
                    "warehouse.aisles",
                    format!(
                        "{} aisles × {} levels overflows the node id space",
                        self.aisles, self.levels
                    ),
                ));
            }
        }
        positive("warehouse.aisle_length_m", self.aisle_length_m)?;
        positive("warehouse.level_height_m", self.level_height_m)?;
        positive("warehouse.speed_x", self.speed_x)?;
        positive("warehouse.speed_z", self.speed_z)?;
        positive("warehouse.accel_x", self.accel_x)?;
        positive("warehouse.accel_z", self.accel_z)?;
        Ok(())
    }
}

// ── Fleet ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FleetConfig {
    pub robot_count:     u32,
    /// Seconds spent picking the tote at the rack, per order.
    pub extraction_secs: f64,
    pub upgrade:         UpgradeRule,
    /// Axis speed (m/s) of an upgraded fleet under [`UpgradeRule::Toggle`].
    pub upgraded_speed:  f64,
    pub policy:          AssignmentPolicy,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            robot_count:     1,
            extraction_secs: 2.0,
            upgrade:         UpgradeRule::default(),
            upgraded_speed:  1.5,
            policy:          AssignmentPolicy::RoundRobin,
        }
    }
}

impl FleetConfig {
    /// Whether the upgrade surcharge applies to this fleet.
    pub fn is_upgraded(&self) -> bool {
        match self.upgrade {
            UpgradeRule::Toggle(on) => on,
            UpgradeRule::ExtractionBelow(threshold) => self.extraction_secs < threshold,
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.robot_count == 0 {
            return Err(CoreError::config("fleet.robot_count", "must be at least 1"));
        }
        non_negative("fleet.extraction_secs", self.extraction_secs)?;
        if let UpgradeRule::Toggle(true) = self.upgrade {
            positive("fleet.upgraded_speed", self.upgraded_speed)?;
        }
        Ok(())
    }
}

// ── Workload ──────────────────────────────────────────────────────────────────

/// One externally supplied order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderSpec {
    pub aisle:    u32,
    pub level:    u32,
    /// Lower is more urgent.  `None` sorts after every explicit priority.
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: Option<u32>,
}

/// Where the orders of a run come from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OrderSource {
    /// `count` targets sampled uniformly (with replacement) over storage nodes.
    Synthetic { count: usize },
    Explicit(Vec<OrderSpec>),
}

impl Default for OrderSource {
    fn default() -> Self {
        OrderSource::Synthetic { count: 1_000 }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorkloadConfig {
    pub orders:                OrderSource,
    /// Congestion scaling, floored at 1.0 wherever it is applied.
    pub traffic_multiplier:    f64,
    /// Upper bound on proximity-batch size.  1 disables batching.
    pub batch_size:            usize,
    /// How "nearest" is measured when growing a batch.
    pub batch_metric:          ProximityMetric,
    /// Dispatch in ascending priority before batching.
    pub prioritize:            bool,
    /// Count same-rack overlaps and charge congestion delay.
    pub congestion:            bool,
    /// Bounds of the per-overlap delay draw, seconds.
    pub delay_jitter_min_secs: f64,
    pub delay_jitter_max_secs: f64,
    /// Sample a demand factor in `[1, 3)` per slot and scale depot edges by it.
    pub demand_heatmap:        bool,
    /// Master seed for order sampling, heatmap sampling and delay jitter.
    pub seed:                  u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            orders:                OrderSource::default(),
            traffic_multiplier:    1.0,
            batch_size:            3,
            batch_metric:          ProximityMetric::Hops,
            prioritize:            false,
            congestion:            true,
            delay_jitter_min_secs: 1.5,
            delay_jitter_max_secs: 3.5,
            demand_heatmap:        true,
            seed:                  42,
        }
    }
}

impl WorkloadConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.batch_size == 0 {
            return Err(CoreError::config("workload.batch_size", "must be at least 1"));
        }
        non_negative("workload.traffic_multiplier", self.traffic_multiplier)?;
        non_negative("workload.delay_jitter_min_secs", self.delay_jitter_min_secs)?;
        non_negative("workload.delay_jitter_max_secs", self.delay_jitter_max_secs)?;
        if self.delay_jitter_min_secs > self.delay_jitter_max_secs {
            return Err(CoreError::config(
                "workload.delay_jitter_min_secs",
                format!(
                    "{} exceeds delay_jitter_max_secs {}",
                    self.delay_jitter_min_secs, self.delay_jitter_max_secs
                ),
            ));
        }
        Ok(())
    }
}

// ── Cost ──────────────────────────────────────────────────────────────────────

/// Monetary rates for the fleet-level KPIs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CostConfig {
    pub base_cost_per_robot:   f64,
    /// Surcharge per robot when the fleet counts as upgraded.
    pub upgrade_cost:          f64,
    /// Energy cost per metre travelled.
    pub energy_per_meter:      f64,
    pub maintenance_per_robot: f64,
    pub delay_cost_per_sec:    f64,
    pub shift_hours:           f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            base_cost_per_robot:   20.0,
            upgrade_cost:          5.0,
            energy_per_meter:      0.1,
            maintenance_per_robot: 2.0,
            delay_cost_per_sec:    0.05,
            shift_hours:           8.0,
        }
    }
}

impl CostConfig {
    pub fn validate(&self) -> CoreResult<()> {
        non_negative("cost.base_cost_per_robot", self.base_cost_per_robot)?;
        non_negative("cost.upgrade_cost", self.upgrade_cost)?;
        non_negative("cost.energy_per_meter", self.energy_per_meter)?;
        non_negative("cost.maintenance_per_robot", self.maintenance_per_robot)?;
        non_negative("cost.delay_cost_per_sec", self.delay_cost_per_sec)?;
        non_negative("cost.shift_hours", self.shift_hours)?;
        Ok(())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level configuration of one simulation run.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    pub warehouse: WarehouseConfig,
    pub fleet:     FleetConfig,
    pub workload:  WorkloadConfig,
    pub cost:      CostConfig,
}

impl SimConfig {
    /// Reject any configuration that cannot produce a meaningful run.
    pub fn validate(&self) -> CoreResult<()> {
        self.warehouse.validate()?;
        self.fleet.validate()?;
        self.workload.validate()?;
        self.cost.validate()?;
        Ok(())
    }

    /// The warehouse as the fleet actually experiences it: under
    /// `UpgradeRule::Toggle(true)` both axis speeds become `upgraded_speed`.
    pub fn effective_warehouse(&self) -> WarehouseConfig {
        let mut wh = self.warehouse.clone();
        if let UpgradeRule::Toggle(true) = self.fleet.upgrade {
            wh.speed_x = self.fleet.upgraded_speed;
            wh.speed_z = self.fleet.upgraded_speed;
        }
        wh
    }

    /// Per-robot surcharge after applying the upgrade rule.
    pub fn upgrade_cost_per_robot(&self) -> f64 {
        if self.fleet.is_upgraded() { self.cost.upgrade_cost } else { 0.0 }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn positive(field: &'static str, value: f64) -> CoreResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoreError::config(field, format!("must be finite and > 0, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f64) -> CoreResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::config(field, format!("must be finite and >= 0, got {value}")))
    }
}
