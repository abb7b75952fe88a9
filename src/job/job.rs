//! One unit of train-and-score work

use super::runner::RunnerControl;
use crate::data::{Dataset, Value};
use crate::model::{Candidate, Model, Prediction};
use crate::summary::EvaluationSummary;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle state of a job
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Built, not yet checked
    Created,
    /// Inputs validated
    PreChecked,
    /// Train-and-score in progress
    Running,
    /// Produced an evaluation summary
    Succeeded,
    /// Terminal error captured
    Failed,
    /// References released
    CleanedUp,
}

/// Phase in which a job failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobPhase {
    /// Input validation before any work
    PreCheck,
    /// Training or scoring
    Process,
    /// Output validation
    PostCheck,
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobPhase::PreCheck => "pre-check",
            JobPhase::Process => "process",
            JobPhase::PostCheck => "post-check",
        };
        write!(f, "{name}")
    }
}

/// A single candidate/fold failure, carrying phase and cause
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Job for '{candidate}' (fold {fold}) failed during {phase}: {message}")]
pub struct JobError {
    /// Candidate display name
    pub candidate: String,
    /// Fold index the job was built for
    pub fold: usize,
    /// Phase the failure originated in
    pub phase: JobPhase,
    /// Underlying cause
    pub message: String,
}

impl JobError {
    /// Create a job error
    pub fn new(
        candidate: impl Into<String>,
        fold: usize,
        phase: JobPhase,
        message: impl Into<String>,
    ) -> Self {
        Self {
            candidate: candidate.into(),
            fold,
            phase,
            message: message.into(),
        }
    }
}

/// Outcome of one job, retrievable by the job's original index
#[derive(Debug)]
pub enum JobOutcome {
    /// The job produced an evaluation summary
    Succeeded(EvaluationSummary),
    /// The job failed with a captured error
    Failed(JobError),
    /// The job was never started (batch cancelled first)
    NotRun,
}

impl JobOutcome {
    /// Whether the job produced a summary
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded(_))
    }
}

/// Trains a candidate copy on a train set and scores it on a test set
///
/// Lifecycle: `Created -> PreChecked -> Running -> Succeeded | Failed ->
/// CleanedUp`. A failure in any phase is captured as a [`JobError`], never
/// propagated as a panic across the batch.
pub struct CrossValidationJob {
    candidate_name: String,
    model: Option<Box<dyn Model>>,
    train: Option<Dataset>,
    test: Option<Dataset>,
    fold: usize,
    discard_predictions: bool,
    state: JobState,
    summary: Option<EvaluationSummary>,
}

impl CrossValidationJob {
    /// Build a job from a candidate specification and a train/test pair
    ///
    /// The candidate is spawned into an independent model instance, so the
    /// caller's specification stays read-only.
    pub fn new(candidate: &dyn Candidate, train: Dataset, test: Dataset, fold: usize) -> Self {
        Self {
            candidate_name: candidate.name().to_string(),
            model: Some(candidate.spawn()),
            train: Some(train),
            test: Some(test),
            fold,
            discard_predictions: false,
            state: JobState::Created,
            summary: None,
        }
    }

    /// Drop per-record predictions from the produced summary
    pub fn discard_predictions(mut self, value: bool) -> Self {
        self.discard_predictions = value;
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Fold index this job was built for
    pub fn fold(&self) -> usize {
        self.fold
    }

    /// Candidate display name
    pub fn candidate_name(&self) -> &str {
        &self.candidate_name
    }

    /// Validate inputs; a failure reason means `process` is never called
    fn pre_process_check(&self) -> Option<String> {
        if self.model.is_none() {
            return Some("No model instance".to_string());
        }
        let train = match &self.train {
            Some(t) => t,
            None => return Some("No train set".to_string()),
        };
        if train.is_empty() {
            return Some("Train set is empty".to_string());
        }
        let test = match &self.test {
            Some(t) => t,
            None => return Some("No test set".to_string()),
        };
        if train.schema().target_index().is_none() {
            return Some("No target attribute designated".to_string());
        }
        if !train.schema().compatible_with(test.schema()) {
            return Some("Train and test schemas are incompatible".to_string());
        }
        None
    }

    /// Train on the train set, score on the test set
    fn process(&mut self, control: &RunnerControl) -> Result<(), String> {
        let (Some(model), Some(train), Some(test)) =
            (self.model.as_mut(), self.train.as_ref(), self.test.as_ref())
        else {
            return Err("Job inputs already released".to_string());
        };

        // never interrupt a single training run; check before it starts
        if control.should_stop() {
            return Err("Stopped before training".to_string());
        }
        model.fit(train).map_err(|e| e.to_string())?;

        let schema = train.schema();
        let nominal_labels = schema
            .target_attribute()
            .map(|a| a.kind().labels().to_vec())
            .unwrap_or_default();
        let mut summary = if nominal_labels.is_empty() {
            EvaluationSummary::numeric()
        } else {
            EvaluationSummary::nominal(nominal_labels)
        };
        if self.discard_predictions {
            summary = summary.without_predictions();
        }
        let prior = train.target_mean().unwrap_or(0.0);

        for row in 0..test.len() {
            // record boundary is a safe suspension point
            if control.should_stop() {
                return Err("Stopped during scoring".to_string());
            }
            let actual = match test.target_value(row) {
                Some(value) if !value.is_missing() => value,
                _ => continue,
            };
            let record = match test.record(row) {
                Some(r) => r,
                None => continue,
            };
            let predicted = model.predict(record, schema).map_err(|e| e.to_string())?;
            match (actual, predicted) {
                (Value::Nominal(a), Prediction::Nominal(p)) => {
                    summary.push_nominal(row, a, p).map_err(|e| e.to_string())?;
                }
                (Value::Numeric(a), Prediction::Numeric(p)) => {
                    summary
                        .push_numeric(row, a, p, prior)
                        .map_err(|e| e.to_string())?;
                }
                _ => {
                    return Err("Prediction kind does not match the target attribute".to_string())
                }
            }
        }

        self.summary = Some(summary);
        Ok(())
    }

    /// Validate that a summary was produced
    fn post_process_check(&self) -> Option<String> {
        if self.summary.is_none() {
            Some("No evaluation summary produced".to_string())
        } else {
            None
        }
    }

    /// Drive the job through its lifecycle
    ///
    /// Always ends in `CleanedUp`; the summary (or error) is moved into the
    /// returned outcome.
    pub fn run(&mut self, control: &RunnerControl) -> JobOutcome {
        if let Some(reason) = self.pre_process_check() {
            return self.fail(JobPhase::PreCheck, reason);
        }
        self.state = JobState::PreChecked;

        self.state = JobState::Running;
        if let Err(reason) = self.process(control) {
            return self.fail(JobPhase::Process, reason);
        }

        if let Some(reason) = self.post_process_check() {
            return self.fail(JobPhase::PostCheck, reason);
        }
        self.state = JobState::Succeeded;
        let summary = self.summary.take();
        self.clean_up();
        match summary {
            Some(summary) => JobOutcome::Succeeded(summary),
            None => JobOutcome::Failed(JobError::new(
                self.candidate_name.clone(),
                self.fold,
                JobPhase::PostCheck,
                "No evaluation summary produced",
            )),
        }
    }

    fn fail(&mut self, phase: JobPhase, reason: String) -> JobOutcome {
        self.state = JobState::Failed;
        let error = JobError::new(self.candidate_name.clone(), self.fold, phase, reason);
        self.clean_up();
        JobOutcome::Failed(error)
    }

    /// Release model, train, test, and summary references
    ///
    /// Safe to call more than once.
    pub fn clean_up(&mut self) {
        self.model = None;
        self.train = None;
        self.test = None;
        self.summary = None;
        self.state = JobState::CleanedUp;
    }
}
