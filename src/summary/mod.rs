//! Evaluation summaries, statistics, and aggregation
//!
//! - `summary`: accumulated scoring statistics for one train/test pass,
//!   with a commutative, associative merge
//! - `statistic`: scalar projections with a fixed polarity table
//! - `aggregate`: combines per-fold summaries into one composite

mod aggregate;
mod statistic;
mod summary;

#[cfg(test)]
mod tests;

pub use aggregate::{aggregate, AggregateSummaries};
pub use statistic::Statistic;
pub use summary::{EvaluationSummary, PredictionRecord};
