//! Evaluation jobs and the bounded-concurrency job runner
//!
//! - `job`: one unit of train-and-score work with a defined lifecycle and
//!   failure capture
//! - `runner`: worker pool with pause/resume/cancel and per-job completion
//!   notification

mod job;
mod runner;


pub use job::{CrossValidationJob, JobError, JobOutcome, JobPhase, JobState};
pub use runner::{BatchResult, JobRunner, ProgressObserver, RunnerControl};
