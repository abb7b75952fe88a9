//! Tests for single-candidate evaluation

use super::*;
use crate::error::EvalError;
use crate::evaluation::{CrossValidationExecution, EvalOptions};
use crate::job::{JobOutcome, ProgressObserver};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_invalid_options_rejected_up_front() {
    let err = CrossValidationExecution::new(EvalOptions {
        folds: 1,
        ..Default::default()
    })
    .err()
    .unwrap();
    assert!(matches!(err, EvalError::Configuration(_)));

    let err = CrossValidationExecution::new(EvalOptions {
        parallelism: -2,
        ..Default::default()
    })
    .err()
    .unwrap();
    assert!(matches!(err, EvalError::Configuration(_)));
}

#[test]
fn test_evaluate_composite_covers_every_record() {
    let execution = CrossValidationExecution::new(EvalOptions {
        folds: 5,
        seed: 42,
        ..Default::default()
    })
    .unwrap();
    let data = labeled_data(100);

    let summary = execution.evaluate(&data, &MajorityCandidate).unwrap();
    // every record is scored exactly once across the folds
    assert_eq!(summary.num_instances(), 100);
    assert!(summary.is_nominal());
    assert_eq!(summary.predictions().unwrap().len(), 100);
}

#[test]
fn test_evaluate_deterministic_for_fixed_seed() {
    let data = labeled_data(60);
    let options = EvalOptions {
        folds: 4,
        seed: 7,
        ..Default::default()
    };

    let a = CrossValidationExecution::new(options.clone())
        .unwrap()
        .evaluate(&data, &MajorityCandidate)
        .unwrap();
    let b = CrossValidationExecution::new(options)
        .unwrap()
        .evaluate(&data, &MajorityCandidate)
        .unwrap();

    assert_eq!(a.num_instances(), b.num_instances());
    assert_eq!(a.correct(), b.correct());
    for actual in 0..2 {
        for predicted in 0..2 {
            assert_eq!(a.confusion(actual, predicted), b.confusion(actual, predicted));
        }
    }
}

#[test]
fn test_evaluate_numeric_candidate() {
    let execution = CrossValidationExecution::new(EvalOptions {
        folds: 5,
        stratify: false,
        ..Default::default()
    })
    .unwrap();
    let data = numeric_data(50);

    let unbiased = execution
        .evaluate(&data, &BiasedMeanCandidate::new("mean", 0.0))
        .unwrap();
    let biased = execution
        .evaluate(&data, &BiasedMeanCandidate::new("mean+10", 10.0))
        .unwrap();

    assert!(
        unbiased.root_mean_squared_error().unwrap()
            < biased.root_mean_squared_error().unwrap()
    );
}

#[test]
fn test_evaluate_parallel_matches_sequential() {
    let data = labeled_data(80);
    let sequential = CrossValidationExecution::new(EvalOptions {
        folds: 8,
        seed: 3,
        parallelism: 1,
        ..Default::default()
    })
    .unwrap()
    .evaluate(&data, &MajorityCandidate)
    .unwrap();

    let parallel = CrossValidationExecution::new(EvalOptions {
        folds: 8,
        seed: 3,
        parallelism: -1,
        ..Default::default()
    })
    .unwrap()
    .evaluate(&data, &MajorityCandidate)
    .unwrap();

    assert_eq!(sequential.num_instances(), parallel.num_instances());
    assert_eq!(sequential.correct(), parallel.correct());
    for actual in 0..2 {
        for predicted in 0..2 {
            assert_eq!(
                sequential.confusion(actual, predicted),
                parallel.confusion(actual, predicted)
            );
        }
    }
}

#[test]
fn test_evaluate_with_views_matches_copies() {
    let data = labeled_data(40);
    let copies = CrossValidationExecution::new(EvalOptions {
        folds: 4,
        seed: 5,
        ..Default::default()
    })
    .unwrap()
    .evaluate(&data, &MajorityCandidate)
    .unwrap();

    let views = CrossValidationExecution::new(EvalOptions {
        folds: 4,
        seed: 5,
        use_views: true,
        ..Default::default()
    })
    .unwrap()
    .evaluate(&data, &MajorityCandidate)
    .unwrap();

    assert_eq!(copies.correct(), views.correct());
    // the source dataset is untouched by view-based evaluation
    assert_eq!(data.len(), 40);
}

#[test]
fn test_discard_predictions_keeps_aggregate_counts() {
    let data = labeled_data(30);
    let summary = CrossValidationExecution::new(EvalOptions {
        folds: 3,
        discard_predictions: true,
        parallelism: 2,
        ..Default::default()
    })
    .unwrap()
    .evaluate(&data, &MajorityCandidate)
    .unwrap();

    assert_eq!(summary.predictions(), None);
    assert_eq!(summary.num_instances(), 30);
}

#[test]
fn test_evaluate_job_failure_names_candidate_and_fold() {
    let data = labeled_data(20);
    let err = CrossValidationExecution::new(EvalOptions {
        folds: 4,
        ..Default::default()
    })
    .unwrap()
    .evaluate(&data, &BrokenCandidate)
    .unwrap_err();

    match err {
        EvalError::Job(job_error) => {
            assert_eq!(job_error.candidate, "broken");
            assert!(job_error.message.contains("deliberate training failure"));
        }
        other => panic!("expected a job error, got {other}"),
    }
}

#[test]
fn test_evaluate_cancelled() {
    struct CancelAfterFirst {
        control: Arc<crate::job::RunnerControl>,
        finished: AtomicUsize,
    }
    impl ProgressObserver for CancelAfterFirst {
        fn job_finished(&self, _index: usize, _outcome: &JobOutcome) {
            self.finished.fetch_add(1, Ordering::SeqCst);
            self.control.cancel();
        }
    }

    let mut execution = CrossValidationExecution::new(EvalOptions {
        folds: 4,
        ..Default::default()
    })
    .unwrap();
    let observer = Arc::new(CancelAfterFirst {
        control: execution.control(),
        finished: AtomicUsize::new(0),
    });
    execution.add_observer(observer.clone());

    let err = execution.evaluate(&labeled_data(20), &MajorityCandidate).unwrap_err();
    assert!(matches!(err, EvalError::Cancelled));
    // every submitted job was accounted for, run or not
    assert_eq!(observer.finished.load(Ordering::SeqCst), 4);
}

#[test]
fn test_observer_sees_every_job() {
    struct Progress {
        finished: AtomicUsize,
        batches: AtomicUsize,
    }
    impl ProgressObserver for Progress {
        fn batch_started(&self, total: usize) {
            assert_eq!(total, 5);
        }
        fn job_finished(&self, _index: usize, outcome: &JobOutcome) {
            assert!(outcome.is_success());
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
        fn batch_finished(&self, stopped: bool) {
            assert!(!stopped);
            self.batches.fetch_add(1, Ordering::SeqCst);
        }
    }

    let progress = Arc::new(Progress {
        finished: AtomicUsize::new(0),
        batches: AtomicUsize::new(0),
    });
    let mut execution = CrossValidationExecution::new(EvalOptions {
        folds: 5,
        ..Default::default()
    })
    .unwrap();
    execution.add_observer(progress.clone());

    execution.evaluate(&labeled_data(50), &MajorityCandidate).unwrap();
    assert_eq!(progress.finished.load(Ordering::SeqCst), 5);
    assert_eq!(progress.batches.load(Ordering::SeqCst), 1);
}
