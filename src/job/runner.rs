//! Bounded-concurrency execution of a job batch

use super::job::{CrossValidationJob, JobOutcome};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Condvar, Mutex, PoisonError};
use std::thread;

/// Per-job completion notification
///
/// Fired exactly once per job, in completion order, without the runner
/// depending on any caller machinery.
pub trait ProgressObserver: Send + Sync {
    /// A batch of `total` jobs is about to run
    fn batch_started(&self, _total: usize) {}

    /// One job finished with the given outcome
    fn job_finished(&self, index: usize, outcome: &JobOutcome);

    /// The batch is done; `stopped` when it was cancelled
    fn batch_finished(&self, _stopped: bool) {}
}

/// Cooperative pause/cancel state shared by one evaluation call
///
/// Workers check the pause flag before claiming a new job and the stop flag
/// at safe points inside a job. A per-call object, never process-wide.
#[derive(Debug, Default)]
pub struct RunnerControl {
    paused: Mutex<bool>,
    resumed: Condvar,
    stopped: AtomicBool,
}

impl RunnerControl {
    /// Create an unpaused, unstopped control
    pub fn new() -> Self {
        Self::default()
    }

    /// Block claiming of new jobs; in-flight jobs finish
    pub fn pause(&self) {
        *self.paused.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }

    /// Unblock claiming of new jobs
    pub fn resume(&self) {
        *self.paused.lock().unwrap_or_else(PoisonError::into_inner) = false;
        self.resumed.notify_all();
    }

    /// Request cooperative termination of the batch
    ///
    /// Not-yet-started jobs are never run; in-flight jobs stop at their
    /// next checkpoint. Wakes paused workers so they can observe the stop.
    pub fn cancel(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        let _guard = self.paused.lock().unwrap_or_else(PoisonError::into_inner);
        self.resumed.notify_all();
    }

    /// Whether termination has been requested
    pub fn should_stop(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Whether claiming of new jobs is currently blocked
    pub fn is_paused(&self) -> bool {
        *self.paused.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clear pause and stop flags for a fresh batch
    pub(crate) fn reset(&self) {
        self.stopped.store(false, Ordering::SeqCst);
        *self.paused.lock().unwrap_or_else(PoisonError::into_inner) = false;
        self.resumed.notify_all();
    }

    /// Block while paused; `false` when the batch was stopped instead
    fn wait_while_paused(&self) -> bool {
        let mut paused = self.paused.lock().unwrap_or_else(PoisonError::into_inner);
        while *paused && !self.should_stop() {
            paused = self
                .resumed
                .wait(paused)
                .unwrap_or_else(PoisonError::into_inner);
        }
        !self.should_stop()
    }
}

/// Per-job outcomes of one batch, addressable by original job index
#[derive(Debug)]
pub struct BatchResult {
    /// Outcome per job, in submission order
    pub outcomes: Vec<JobOutcome>,
    /// Whether the batch was stopped before completing
    pub stopped: bool,
}

impl BatchResult {
    /// Outcome of the job submitted at `index`
    pub fn outcome(&self, index: usize) -> Option<&JobOutcome> {
        self.outcomes.get(index)
    }
}

/// Runs a batch of jobs with bounded parallelism
///
/// `parallelism` semantics: `0` or `1` runs jobs sequentially on the
/// calling thread; `n > 1` uses a pool of `min(n, available cores)`
/// workers; `-1` sizes the pool to the available cores. Dispatch and
/// completion order are unspecified, but every job's outcome is
/// retrievable by its original index.
pub struct JobRunner {
    parallelism: i32,
    control: Arc<RunnerControl>,
    observers: Vec<Arc<dyn ProgressObserver>>,
}

impl JobRunner {
    /// Create a runner with the given parallelism
    pub fn new(parallelism: i32) -> Self {
        Self {
            parallelism,
            control: Arc::new(RunnerControl::new()),
            observers: Vec::new(),
        }
    }

    /// Share an externally held control (for pause/resume/cancel)
    pub fn with_control(mut self, control: Arc<RunnerControl>) -> Self {
        self.control = control;
        self
    }

    /// Register a completion observer
    pub fn add_observer(&mut self, observer: Arc<dyn ProgressObserver>) {
        self.observers.push(observer);
    }

    /// Handle on the runner's control
    pub fn control(&self) -> Arc<RunnerControl> {
        Arc::clone(&self.control)
    }

    /// Worker count the configured parallelism resolves to
    pub fn actual_threads(&self) -> usize {
        let cores = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        match self.parallelism {
            -1 => cores,
            n if n > 1 => (n as usize).min(cores),
            _ => 1,
        }
    }

    /// Run all jobs, blocking until the batch finishes or is stopped
    pub fn run(&self, jobs: Vec<CrossValidationJob>) -> BatchResult {
        let total = jobs.len();
        for observer in &self.observers {
            observer.batch_started(total);
        }

        let outcomes = if self.actual_threads() <= 1 {
            self.run_sequential(jobs)
        } else {
            self.run_parallel(jobs)
        };

        let stopped = self.control.should_stop();
        for observer in &self.observers {
            observer.batch_finished(stopped);
        }
        BatchResult { outcomes, stopped }
    }

    fn run_sequential(&self, jobs: Vec<CrossValidationJob>) -> Vec<JobOutcome> {
        let mut outcomes = Vec::with_capacity(jobs.len());
        for (index, mut job) in jobs.into_iter().enumerate() {
            let outcome = if self.control.wait_while_paused() {
                job.run(&self.control)
            } else {
                job.clean_up();
                JobOutcome::NotRun
            };
            self.notify(index, &outcome);
            outcomes.push(outcome);
        }
        outcomes
    }

    fn run_parallel(&self, jobs: Vec<CrossValidationJob>) -> Vec<JobOutcome> {
        let total = jobs.len();
        let threads = self.actual_threads().min(total.max(1));
        let queue: Arc<Mutex<VecDeque<(usize, CrossValidationJob)>>> =
            Arc::new(Mutex::new(jobs.into_iter().enumerate().collect()));
        let (tx, rx) = mpsc::channel::<(usize, JobOutcome)>();

        let mut handles = Vec::with_capacity(threads);
        for _ in 0..threads {
            let queue = Arc::clone(&queue);
            let control = Arc::clone(&self.control);
            let tx = tx.clone();
            handles.push(thread::spawn(move || loop {
                if !control.wait_while_paused() {
                    break;
                }
                let next = queue
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop_front();
                let Some((index, mut job)) = next else { break };
                let outcome = job.run(&control);
                if tx.send((index, outcome)).is_err() {
                    break;
                }
            }));
        }
        drop(tx);

        let mut slots: Vec<Option<JobOutcome>> = (0..total).map(|_| None).collect();
        for (index, outcome) in rx {
            self.notify(index, &outcome);
            slots[index] = Some(outcome);
        }
        for handle in handles {
            let _ = handle.join();
        }

        // jobs never claimed because the batch was stopped
        let mut leftover = queue.lock().unwrap_or_else(PoisonError::into_inner);
        while let Some((index, mut job)) = leftover.pop_front() {
            job.clean_up();
            let outcome = JobOutcome::NotRun;
            self.notify(index, &outcome);
            slots[index] = Some(outcome);
        }
        drop(leftover);

        slots
            .into_iter()
            .map(|outcome| outcome.unwrap_or(JobOutcome::NotRun))
            .collect()
    }

    fn notify(&self, index: usize, outcome: &JobOutcome) {
        for observer in &self.observers {
            observer.job_finished(index, outcome);
        }
    }
}
