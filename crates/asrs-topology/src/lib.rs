//! `asrs-topology` — warehouse graph, movement rules, and routing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`graph`]    | `WarehouseGraph` (CSR), `WarehouseGraphBuilder`              |
//! | [`topology`] | `build_warehouse`, `validate_connectivity`, depot edge model |
//! | [`heatmap`]  | `DemandHeatmap` per-slot demand factors                      |
//! | [`blocked`]  | `BlockedNodes` exclusion set (filtered graph view)           |
//! | [`router`]   | `Router` trait, `Path`, `DijkstraRouter`, `route`, hops      |
//! | [`legality`] | `validate_path` movement-rule check                          |
//! | [`error`]    | `TopologyError`, `TopologyResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `fx-hash` | FxHash for `BlockedNodes`.                                 |
//! | `serde`   | Derives `Serialize`/`Deserialize` on public types.         |

pub mod blocked;
pub mod error;
pub mod graph;
pub mod heatmap;
pub mod legality;
pub mod router;
pub mod topology;

#[cfg(test)]
mod tests;

pub use blocked::BlockedNodes;
pub use error::{TopologyError, TopologyResult};
pub use graph::{WarehouseGraph, WarehouseGraphBuilder};
pub use heatmap::DemandHeatmap;
pub use legality::{is_legal_path, validate_path};
pub use router::{DijkstraRouter, Path, Router, hop_distances, route};
pub use topology::{build_warehouse, depot_edge_secs, validate_connectivity};
