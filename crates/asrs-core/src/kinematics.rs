//! Travel-time model for a shuttle moving along two independent axes.
//!
//! # Model
//!
//! Each axis is covered with constant acceleration to the midpoint and
//! symmetric deceleration to the target, with no cruise phase:
//!
//! ```text
//! t_axis = 2 · sqrt(d / (2 · a))
//! time   = t_x + t_z
//! ```
//!
//! The rated top speed is deliberately not applied as a cap.  Over rack-scale
//! distances this overestimates nothing the callers rely on, and the formula
//! is kept exactly as the domain owners specified it.

/// Seconds to cover `dx` horizontally and `dz` vertically with accelerations
/// `ax` and `az` (m/s²).
///
/// Negative distances are treated as zero.  Accelerations must be positive;
/// configuration validation guarantees that for every value reaching here.
#[inline]
pub fn travel_time(dx: f64, dz: f64, ax: f64, az: f64) -> f64 {
    axis_time(dx, ax) + axis_time(dz, az)
}

/// [`travel_time`] inflated by a traffic multiplier and a demand factor.
///
/// Both factors are floored at 1.0 by [`clamp_factor`]: a quiet aisle or a
/// cold SKU never makes a shuttle faster than its baseline.
#[inline]
pub fn adjusted_travel_time(
    dx: f64,
    dz: f64,
    ax: f64,
    az: f64,
    traffic_multiplier: f64,
    demand_factor: f64,
) -> f64 {
    travel_time(dx, dz, ax, az) * clamp_factor(traffic_multiplier) * clamp_factor(demand_factor)
}

/// Floor a scaling factor at 1.0.  `NaN` also maps to 1.0.
#[inline]
pub fn clamp_factor(factor: f64) -> f64 {
    if factor > 1.0 { factor } else { 1.0 }
}

#[inline]
fn axis_time(distance: f64, accel: f64) -> f64 {
    debug_assert!(accel > 0.0, "acceleration must be positive, got {accel}");
    let d = distance.max(0.0);
    2.0 * (d / (2.0 * accel)).sqrt()
}
