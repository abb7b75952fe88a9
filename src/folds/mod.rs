//! Deterministic train/test fold generation
//!
//! K-fold and leave-one-out splitting with optional stratification,
//! seeded for reproducibility. Subsets are produced as copies or as views
//! into the source dataset.

mod fold;
mod generator;


pub use fold::Fold;
pub use generator::{FoldGenerator, Folds, LEAVE_ONE_OUT};
