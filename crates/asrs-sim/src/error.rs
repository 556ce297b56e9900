use asrs_core::CoreError;
use asrs_orders::OrderError;
use asrs_topology::TopologyError;
use thiserror::Error;

/// Conditions that abort a run.
///
/// Per-order routing and legality failures never appear here; they are
/// collected as [`SimIssue`](crate::SimIssue)s instead.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("warehouse graph error: {0}")]
    Topology(#[from] TopologyError),

    #[error("order input error: {0}")]
    Orders(#[from] OrderError),
}

pub type SimResult<T> = Result<T, SimError>;
