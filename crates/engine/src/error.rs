//! The module contains the errors the engine can throw.
//!
//! Missing or zero-valued source data is never an error: a store with no
//! records yields an all-zero report with absent ratios. The variants below
//! all indicate a caller contract violation and are never retried.

use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A daily-series query was given `from > to`.
    #[error("invalid range: {0}")]
    InvalidRange(String),
    /// Calendar arithmetic could not resolve the month boundaries.
    #[error("invalid month: {0}")]
    InvalidMonth(String),
}
