//! `asrs-orders` — the workload side of a run.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`order`]     | `Order`, `resolve_orders`                                  |
//! | [`generator`] | `generate_orders` (seeded uniform sampling)                |
//! | [`loader`]    | `load_orders_csv`, `load_orders_reader`                    |
//! | [`priority`]  | `PriorityQueue`, `prioritize` (stable min-priority order)  |
//! | [`batching`]  | `batch_by_proximity`, `plan_dispatch`, `BatchPlan`         |
//! | [`error`]     | `OrderError`, `OrderResult<T>`                             |
//!
//! # Dispatch order (summary)
//!
//! ```text
//! orders ──(prioritize?)──► ascending priority, ties by arrival
//!        ──(batch_size B)──► greedy nearest-neighbour batches of ≤ B
//!        ──────────────────► flattened batch by batch into the simulator
//! ```

pub mod batching;
pub mod error;
pub mod generator;
pub mod loader;
pub mod order;
pub mod priority;


pub use batching::{Batch, BatchPlan, SkippedOrder, batch_by_proximity, plan_dispatch};
pub use error::{OrderError, OrderResult};
pub use generator::generate_orders;
pub use loader::{load_orders_csv, load_orders_reader};
pub use order::{Order, resolve_orders};
pub use priority::{PriorityQueue, prioritize};
