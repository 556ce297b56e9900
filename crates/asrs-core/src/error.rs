//! Core error type.
//!
//! Sub-crates define their own error enums and convert `CoreError` into them
//! via `From`, so configuration failures keep their field-level detail all the
//! way up to the caller.

use thiserror::Error;

/// Errors produced by `asrs-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A configuration value was rejected before any work started.
    #[error("invalid configuration: {field}: {reason}")]
    InvalidConfig {
        field:  &'static str,
        reason: String,
    },
}

impl CoreError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        CoreError::InvalidConfig { field, reason: reason.into() }
    }
}

/// Shorthand result type for `asrs-core`.
pub type CoreResult<T> = Result<T, CoreError>;
