//! Top-level evaluation API
//!
//! Wires the fold generator, job runner, aggregator, and ranker into the
//! two caller-facing operations: `evaluate` for a single candidate and
//! `evaluate_many` for ranking a batch of candidates.

mod config;
mod execution;

#[cfg(test)]
mod tests;

pub use config::EvalOptions;
pub use execution::CrossValidationExecution;
