use asrs_core::Slot;
use asrs_topology::TopologyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("order targets slot {slot}, which is outside the rack")]
    UnknownSlot { slot: Slot },

    #[error("batch size must be at least 1, got {0}")]
    InvalidBatchSize(usize),

    #[error("routing failed while batching: {0}")]
    Topology(#[from] TopologyError),
}

pub type OrderResult<T> = Result<T, OrderError>;
