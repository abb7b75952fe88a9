//! Cross-validated model evaluation
//!
//! Evaluates candidate predictive models against a dataset by partitioning
//! it into reproducible train/test folds, running the train-and-score work
//! for each fold (optionally in parallel), aggregating the per-fold results
//! into one composite summary, and ranking multiple candidates by a chosen
//! statistic.
//!
//! ## Architecture
//!
//! - `data`: schema-checked, immutable datasets with copy or view subsets
//! - `model`: the candidate/model capability traits supplied by the caller
//! - `folds`: deterministic, optionally stratified fold generation
//! - `job`: train-and-score jobs and the pausable, cancellable runner
//! - `summary`: mergeable evaluation summaries, statistics, aggregation
//! - `rank`: polarity-aware ranking with deterministic tie-breaking
//! - `evaluation`: the top-level `evaluate` / `evaluate_many` API
//!
//! ## Example
//!
//! ```ignore
//! use evaluar::{CrossValidationExecution, EvalOptions, Statistic};
//!
//! let execution = CrossValidationExecution::new(EvalOptions {
//!     folds: 10,
//!     seed: 1,
//!     ..Default::default()
//! })?;
//!
//! let summary = execution.evaluate(&dataset, &candidate)?;
//! println!("Accuracy: {:.2}%", summary.accuracy().unwrap_or(0.0) * 100.0);
//! ```

pub mod data;
pub mod error;
pub mod evaluation;
pub mod folds;
pub mod job;
pub mod model;
pub mod rank;
pub mod summary;

// Re-export main types
pub use data::{Attribute, AttributeKind, Dataset, DatasetBuilder, Record, Schema, Value};
pub use error::{EvalError, Result};
pub use evaluation::{CrossValidationExecution, EvalOptions};
pub use folds::{Fold, FoldGenerator, Folds, LEAVE_ONE_OUT};
pub use job::{
    BatchResult, CrossValidationJob, JobError, JobOutcome, JobPhase, JobRunner, JobState,
    ProgressObserver, RunnerControl,
};
pub use model::{Candidate, Model, Prediction};
pub use rank::{rank, RankedCandidate, RankingOutcome, FULL_RANKING};
pub use summary::{aggregate, AggregateSummaries, EvaluationSummary, PredictionRecord, Statistic};
