//! A single train/test partition

use crate::data::Dataset;

/// One train/test partition produced by the fold generator
///
/// Train and test are disjoint; across a full enumeration the test subsets
/// partition the source dataset exactly once.
#[derive(Clone, Debug)]
pub struct Fold {
    /// Zero-based fold number
    pub index: usize,
    /// Training subset
    pub train: Dataset,
    /// Test subset
    pub test: Dataset,
    /// Seed the generator was configured with
    pub seed: u64,
    /// Total number of folds in the enumeration
    pub fold_count: usize,
}
