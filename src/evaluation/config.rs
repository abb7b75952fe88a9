//! Evaluation configuration

use crate::error::{EvalError, Result};
use crate::folds::LEAVE_ONE_OUT;
use serde::{Deserialize, Serialize};

/// Configuration for a cross-validation run
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    /// Number of folds; `-1` for leave-one-out
    pub folds: i32,
    /// Random seed for reproducible shuffling
    pub seed: u64,
    /// Preserve class proportions across folds (nominal targets)
    pub stratify: bool,
    /// Keep record order: no shuffling, no stratification
    pub preserve_order: bool,
    /// Build subsets as views instead of copies, to conserve memory
    pub use_views: bool,
    /// Drop per-record predictions from summaries, to conserve memory
    pub discard_predictions: bool,
    /// Worker count: `0`/`1` sequential, `-1` one per core, `n > 1` capped
    /// at the core count
    pub parallelism: i32,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            folds: 10,
            seed: 1,
            stratify: true,
            preserve_order: false,
            use_views: false,
            discard_predictions: false,
            parallelism: 1,
        }
    }
}

impl EvalOptions {
    /// Reject invalid settings before any work starts
    pub fn validate(&self) -> Result<()> {
        if self.folds != LEAVE_ONE_OUT && self.folds < 2 {
            return Err(EvalError::Configuration(format!(
                "Fold count must be >= 2 or {} for leave-one-out, got {}",
                LEAVE_ONE_OUT, self.folds
            )));
        }
        if self.parallelism < -1 {
            return Err(EvalError::Configuration(format!(
                "Parallelism must be >= -1, got {}",
                self.parallelism
            )));
        }
        Ok(())
    }
}
