//! Evaluation error types

use crate::job::JobError;
use thiserror::Error;

/// Errors raised by the evaluation core
#[derive(Debug, Error)]
pub enum EvalError {
    /// Invalid configuration, rejected before any work starts
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Dataset or schema problem (missing target, malformed record)
    #[error("Data error: {0}")]
    Data(String),

    /// Aggregation across incompatible summaries
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A single candidate/fold's train-or-score step failed
    #[error(transparent)]
    Job(#[from] JobError),

    /// Batch stopped by caller request; partial results available
    #[error("Evaluation cancelled")]
    Cancelled,
}

/// Result type for evaluation operations
pub type Result<T> = std::result::Result<T, EvalError>;
