//! Fleet-level throughput and cost indicators.
//!
//! ```text
//! avg         = mean(total_secs) over successful records
//! throughput  = 3600 / avg × robots           (per hour; 0 if avg = 0)
//! shift       = throughput × shift_hours
//! system      = robots × (base + upgrade)
//! energy      = energy_per_meter × Σ distance_m
//! maintenance = maintenance_per_robot × robots
//! cost/txn    = (system + energy + maintenance) / shift   (None if shift = 0)
//! ```

use asrs_core::SimConfig;
use asrs_sim::TransactionRecord;

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetKpis {
    /// Successful transactions in the log.
    pub transactions:             usize,
    pub average_transaction_secs: f64,
    pub throughput_per_hour:      f64,
    pub shift_transactions:       f64,
    pub system_cost:              f64,
    pub energy_cost:              f64,
    pub maintenance_cost:         f64,
    /// `None` when the shift volume is zero.
    pub cost_per_transaction:     Option<f64>,
    /// Latest completion time in the log.
    pub makespan_secs:            f64,
    pub total_distance_m:         f64,
    /// Successful assignments per robot, indexed by `RobotId`.
    pub per_robot:                Vec<u32>,
}

impl FleetKpis {
    pub fn total_cost(&self) -> f64 {
        self.system_cost + self.energy_cost + self.maintenance_cost
    }
}

/// Compute KPIs for `records` under `config`.
///
/// `assignments` is the per-robot success count from the run; it is copied
/// through unchanged.
pub fn fleet_kpis(records: &[TransactionRecord], assignments: &[u32], config: &SimConfig) -> FleetKpis {
    let robots = f64::from(config.fleet.robot_count);
    let cost   = &config.cost;

    let transactions     = records.len();
    let total_secs: f64  = records.iter().map(|r| r.total_secs).sum();
    let total_distance_m = records.iter().map(|r| r.distance_m).sum::<f64>();
    let makespan_secs    = records.iter().map(|r| r.completed_at).fold(0.0, f64::max);

    let average_transaction_secs = if transactions > 0 { total_secs / transactions as f64 } else { 0.0 };
    let throughput_per_hour = if average_transaction_secs > 0.0 {
        3600.0 / average_transaction_secs * robots
    } else {
        0.0
    };
    let shift_transactions = throughput_per_hour * cost.shift_hours;

    let system_cost      = robots * (cost.base_cost_per_robot + config.upgrade_cost_per_robot());
    let energy_cost      = cost.energy_per_meter * total_distance_m;
    let maintenance_cost = cost.maintenance_per_robot * robots;
    let cost_per_transaction = (shift_transactions > 0.0)
        .then(|| (system_cost + energy_cost + maintenance_cost) / shift_transactions);

    FleetKpis {
        transactions,
        average_transaction_secs,
        throughput_per_hour,
        shift_transactions,
        system_cost,
        energy_cost,
        maintenance_cost,
        cost_per_transaction,
        makespan_secs,
        total_distance_m,
        per_robot: assignments.to_vec(),
    }
}
