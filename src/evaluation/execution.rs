//! Cross-validation execution over one or many candidates

use super::config::EvalOptions;
use crate::data::Dataset;
use crate::error::{EvalError, Result};
use crate::folds::{Fold, FoldGenerator};
use crate::job::{CrossValidationJob, JobOutcome, JobRunner, ProgressObserver, RunnerControl};
use crate::model::Candidate;
use crate::rank::{rank, RankingOutcome, FULL_RANKING};
use crate::summary::{AggregateSummaries, EvaluationSummary, Statistic};
use std::sync::Arc;

/// Runs cross-validated evaluations, single- or multi-threaded
///
/// Holds the per-call control shared with the caller: `pause`, `resume`,
/// and `cancel` act on whatever batch is currently running. The dataset is
/// read-only throughout an evaluation.
pub struct CrossValidationExecution {
    options: EvalOptions,
    control: Arc<RunnerControl>,
    observers: Vec<Arc<dyn ProgressObserver>>,
}

impl CrossValidationExecution {
    /// Create an execution, rejecting invalid options up front
    pub fn new(options: EvalOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            control: Arc::new(RunnerControl::new()),
            observers: Vec::new(),
        })
    }

    /// The configuration in use
    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    /// Register a progress observer, notified once per finished job
    pub fn add_observer(&mut self, observer: Arc<dyn ProgressObserver>) {
        self.observers.push(observer);
    }

    /// Handle on the pause/cancel control shared with running batches
    pub fn control(&self) -> Arc<RunnerControl> {
        Arc::clone(&self.control)
    }

    /// Block claiming of new jobs; in-flight jobs finish
    pub fn pause(&self) {
        self.control.pause();
    }

    /// Unblock claiming of new jobs
    pub fn resume(&self) {
        self.control.resume();
    }

    /// Cooperatively stop the running batch
    pub fn cancel(&self) {
        self.control.cancel();
    }

    /// Cross-validate a single candidate into one composite summary
    ///
    /// Generates folds, runs one job per fold, then aggregates the per-fold
    /// summaries. Any fold failure fails the whole evaluation with an error
    /// naming the candidate and fold; a stopped batch yields `Cancelled`.
    pub fn evaluate(
        &self,
        dataset: &Dataset,
        candidate: &dyn Candidate,
    ) -> Result<EvaluationSummary> {
        self.control.reset();

        let mut jobs = Vec::new();
        for fold in self.generator(dataset).generate()? {
            let fold = fold?;
            jobs.push(self.build_job(candidate, fold));
        }

        let result = self.runner().run(jobs);
        if result.stopped {
            return Err(EvalError::Cancelled);
        }

        let mut aggregate = AggregateSummaries::new();
        for outcome in result.outcomes {
            match outcome {
                JobOutcome::Succeeded(summary) => aggregate.add(summary)?,
                JobOutcome::Failed(error) => return Err(EvalError::Job(error)),
                JobOutcome::NotRun => return Err(EvalError::Cancelled),
            }
        }
        aggregate.aggregated()
    }

    /// Cross-validate many candidates and rank them by a statistic
    ///
    /// All candidates are evaluated on the identical fold partition and run
    /// as one batch. Candidates whose evaluation failed are excluded from
    /// the ranking and reported in the outcome's `failures`.
    pub fn evaluate_many(
        &self,
        dataset: &Dataset,
        candidates: &[&dyn Candidate],
        statistic: Statistic,
        top_n: i32,
    ) -> Result<RankingOutcome> {
        if candidates.is_empty() {
            return Err(EvalError::Configuration(
                "No candidates to evaluate".to_string(),
            ));
        }
        if top_n == 0 || top_n < FULL_RANKING {
            return Err(EvalError::Configuration(format!(
                "Ranking max must be >= 1 or {} for the full ranking, got {}",
                FULL_RANKING, top_n
            )));
        }
        self.control.reset();

        // one partition shared by every candidate, for a fair comparison
        let folds: Vec<Fold> = self
            .generator(dataset)
            .generate()?
            .collect::<Result<Vec<_>>>()?;
        let folds_per_candidate = folds.len();

        let mut jobs = Vec::with_capacity(candidates.len() * folds_per_candidate);
        for candidate in candidates {
            for fold in &folds {
                jobs.push(self.build_job(*candidate, fold.clone()));
            }
        }

        let result = self.runner().run(jobs);
        if result.stopped {
            return Err(EvalError::Cancelled);
        }

        let mut outcomes = result.outcomes.into_iter();
        let mut entries = Vec::new();
        let mut failures = Vec::new();
        for index in 0..candidates.len() {
            let mut aggregate = AggregateSummaries::new();
            let mut error: Option<EvalError> = None;
            for _ in 0..folds_per_candidate {
                match outcomes.next() {
                    Some(JobOutcome::Succeeded(summary)) => {
                        if error.is_none() {
                            if let Err(e) = aggregate.add(summary) {
                                error = Some(e);
                            }
                        }
                    }
                    Some(JobOutcome::Failed(job_error)) => {
                        // a missing fold invalidates the whole composite
                        if error.is_none() {
                            error = Some(EvalError::Job(job_error));
                        }
                    }
                    Some(JobOutcome::NotRun) | None => {
                        if error.is_none() {
                            error = Some(EvalError::Cancelled);
                        }
                    }
                }
            }
            match error {
                Some(e) => failures.push((index, e)),
                None => match aggregate.aggregated() {
                    Ok(summary) => entries.push((index, summary)),
                    Err(e) => failures.push((index, e)),
                },
            }
        }

        let ranked = rank(entries, statistic, top_n)?;
        Ok(RankingOutcome { ranked, failures })
    }

    fn generator(&self, dataset: &Dataset) -> FoldGenerator {
        FoldGenerator::new(dataset.clone(), self.options.folds, self.options.seed)
            .stratify(self.options.stratify)
            .use_views(self.options.use_views)
            .preserve_order(self.options.preserve_order)
    }

    fn build_job(&self, candidate: &dyn Candidate, fold: Fold) -> CrossValidationJob {
        CrossValidationJob::new(candidate, fold.train, fold.test, fold.index)
            .discard_predictions(self.options.discard_predictions)
    }

    fn runner(&self) -> JobRunner {
        let mut runner =
            JobRunner::new(self.options.parallelism).with_control(Arc::clone(&self.control));
        for observer in &self.observers {
            runner.add_observer(Arc::clone(observer));
        }
        runner
    }
}
