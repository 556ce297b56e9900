//! `asrs-core` — foundational types for the `asrs` shuttle-warehouse simulator.
//!
//! This crate is a dependency of every other `asrs-*` crate.  It has no
//! `asrs-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`, `RobotId`, `OrderId`, `TxnId`         |
//! | [`slot`]        | `Slot` (aisle, level), `Node` (storage slot or depot)     |
//! | [`kinematics`]  | constant-acceleration travel-time model                   |
//! | [`config`]      | `SimConfig` and its warehouse / fleet / workload / cost parts |
//! | [`rng`]         | `SimRng` (seedable, with deterministic child streams)     |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod kinematics;
pub mod rng;
pub mod slot;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    AssignmentPolicy, CostConfig, FleetConfig, OrderSource, OrderSpec, ProximityMetric, SimConfig,
    TopologyMode, UpgradeRule, WarehouseConfig, WorkloadConfig,
};
pub use error::{CoreError, CoreResult};
pub use ids::{EdgeId, NodeId, OrderId, RobotId, TxnId};
pub use kinematics::{adjusted_travel_time, clamp_factor, travel_time};
pub use rng::{SimRng, streams};
pub use slot::{Node, Slot};
