//! Tests for summaries, statistics, and aggregation

use super::*;
use crate::error::EvalError;

fn two_labels() -> Vec<String> {
    vec!["yes".to_string(), "no".to_string()]
}

fn nominal_summary(pairs: &[(usize, usize)]) -> EvaluationSummary {
    let mut summary = EvaluationSummary::nominal(two_labels());
    for (row, &(actual, predicted)) in pairs.iter().enumerate() {
        summary.push_nominal(row, actual, predicted).unwrap();
    }
    summary
}

fn numeric_summary(pairs: &[(f64, f64)], prior: f64) -> EvaluationSummary {
    let mut summary = EvaluationSummary::numeric();
    for (row, &(actual, predicted)) in pairs.iter().enumerate() {
        summary.push_numeric(row, actual, predicted, prior).unwrap();
    }
    summary
}

#[test]
fn test_nominal_counts() {
    let summary = nominal_summary(&[(0, 0), (0, 1), (1, 1), (1, 1)]);
    assert_eq!(summary.num_instances(), 4);
    assert_eq!(summary.correct(), Some(3));
    assert_eq!(summary.incorrect(), Some(1));
    assert_eq!(summary.accuracy(), Some(0.75));
    assert_eq!(summary.confusion(0, 1), Some(1));
    assert_eq!(summary.confusion(1, 0), Some(0));
}

#[test]
fn test_kappa_perfect_and_chance() {
    let perfect = nominal_summary(&[(0, 0), (1, 1), (0, 0), (1, 1)]);
    assert!((perfect.kappa().unwrap() - 1.0).abs() < 1e-9);

    // all predictions in one class on a balanced target: kappa 0
    let chance = nominal_summary(&[(0, 0), (1, 0), (0, 0), (1, 0)]);
    assert!(chance.kappa().unwrap().abs() < 1e-9);
}

#[test]
fn test_nominal_rejects_bad_class_index() {
    let mut summary = EvaluationSummary::nominal(two_labels());
    let err = summary.push_nominal(0, 0, 2).unwrap_err();
    assert!(matches!(err, EvalError::Data(_)));
}

#[test]
fn test_kind_mismatch_on_push() {
    let mut summary = EvaluationSummary::nominal(two_labels());
    assert!(summary.push_numeric(0, 1.0, 2.0, 0.0).is_err());

    let mut summary = EvaluationSummary::numeric();
    assert!(summary.push_nominal(0, 0, 0).is_err());
}

#[test]
fn test_numeric_errors() {
    let summary = numeric_summary(&[(1.0, 2.0), (3.0, 3.0), (5.0, 3.0)], 3.0);
    // abs errors: 1, 0, 2
    assert!((summary.mean_absolute_error().unwrap() - 1.0).abs() < 1e-9);
    // sq errors: 1, 0, 4 -> rmse sqrt(5/3)
    assert!((summary.root_mean_squared_error().unwrap() - (5.0f64 / 3.0).sqrt()).abs() < 1e-9);
    // prior abs errors: 2, 0, 2 -> rae 3/4
    assert!((summary.relative_absolute_error().unwrap() - 0.75).abs() < 1e-9);
    // prior sq errors: 4, 0, 4 -> rrse sqrt(5/8)
    assert!(
        (summary.root_relative_squared_error().unwrap() - (5.0f64 / 8.0).sqrt()).abs() < 1e-9
    );
}

#[test]
fn test_correlation_perfect() {
    let summary = numeric_summary(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)], 2.0);
    assert!((summary.correlation_coefficient().unwrap() - 1.0).abs() < 1e-9);

    let inverse = numeric_summary(&[(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)], 2.0);
    assert!((inverse.correlation_coefficient().unwrap() + 1.0).abs() < 1e-9);
}

#[test]
fn test_correlation_degenerate_variance() {
    let summary = numeric_summary(&[(1.0, 5.0), (2.0, 5.0), (3.0, 5.0)], 2.0);
    assert_eq!(summary.correlation_coefficient(), Some(0.0));
}

#[test]
fn test_relative_error_undefined_on_constant_target() {
    let summary = numeric_summary(&[(2.0, 1.0), (2.0, 3.0)], 2.0);
    assert_eq!(summary.relative_absolute_error(), None);
    assert!(Statistic::RelativeAbsoluteError.project(&summary).is_err());
}

#[test]
fn test_merge_accumulates_counts() {
    let mut a = nominal_summary(&[(0, 0), (1, 1)]);
    let b = nominal_summary(&[(0, 1), (1, 1)]);
    a.merge(b).unwrap();
    assert_eq!(a.num_instances(), 4);
    assert_eq!(a.correct(), Some(3));
    assert_eq!(a.predictions().unwrap().len(), 4);
}

#[test]
fn test_merge_label_mismatch() {
    let mut a = nominal_summary(&[(0, 0)]);
    let b = EvaluationSummary::nominal(vec!["up".to_string(), "down".to_string()]);
    let err = a.merge(b).unwrap_err();
    assert!(matches!(err, EvalError::SchemaMismatch(_)));
}

#[test]
fn test_merge_kind_mismatch() {
    let mut a = nominal_summary(&[(0, 0)]);
    let err = a.merge(EvaluationSummary::numeric()).unwrap_err();
    assert!(matches!(err, EvalError::SchemaMismatch(_)));
}

#[test]
fn test_merge_discarded_predictions_stay_discarded() {
    let mut a = nominal_summary(&[(0, 0), (1, 0)]);
    let b = nominal_summary(&[(1, 1)]).without_predictions();
    a.merge(b).unwrap();
    assert_eq!(a.predictions(), None);
    // aggregate counts unaffected by the discard
    assert_eq!(a.num_instances(), 3);
    assert_eq!(a.correct(), Some(2));
}

#[test]
fn test_aggregate_order_independence() {
    let parts = [
        nominal_summary(&[(0, 0), (0, 1)]),
        nominal_summary(&[(1, 1), (1, 1), (0, 0)]),
        nominal_summary(&[(1, 0)]),
    ];
    let forward = aggregate(parts.clone()).unwrap();
    let backward = aggregate(parts.iter().rev().cloned()).unwrap();
    assert_eq!(forward.num_instances(), backward.num_instances());
    assert_eq!(forward.correct(), backward.correct());
    for actual in 0..2 {
        for predicted in 0..2 {
            assert_eq!(
                forward.confusion(actual, predicted),
                backward.confusion(actual, predicted)
            );
        }
    }
}

#[test]
fn test_aggregate_empty_fails() {
    assert!(aggregate(Vec::new()).is_err());
}

#[test]
fn test_statistic_polarity() {
    assert!(Statistic::Accuracy.higher_is_better());
    assert!(Statistic::Kappa.higher_is_better());
    assert!(Statistic::CorrelationCoefficient.higher_is_better());
    assert!(!Statistic::MeanAbsoluteError.higher_is_better());
    assert!(!Statistic::RootMeanSquaredError.higher_is_better());
    assert!(!Statistic::RelativeAbsoluteError.higher_is_better());
    assert!(!Statistic::RootRelativeSquaredError.higher_is_better());
    assert!(!Statistic::CombinedError.higher_is_better());
}

#[test]
fn test_statistic_projection_kind_guard() {
    let nominal = nominal_summary(&[(0, 0)]);
    assert!(Statistic::Accuracy.project(&nominal).is_ok());
    assert!(Statistic::RootMeanSquaredError.project(&nominal).is_err());

    let numeric = numeric_summary(&[(1.0, 1.5), (2.0, 2.5)], 1.5);
    assert!(Statistic::RootMeanSquaredError.project(&numeric).is_ok());
    assert!(Statistic::Accuracy.project(&numeric).is_err());
}

#[test]
fn test_combined_error_projection() {
    let summary = numeric_summary(&[(1.0, 1.0), (2.0, 2.0), (3.0, 4.0)], 2.0);
    let rrse = summary.root_relative_squared_error().unwrap();
    let rae = summary.relative_absolute_error().unwrap();
    let cc = summary.correlation_coefficient().unwrap();
    let combined = Statistic::CombinedError.project(&summary).unwrap();
    assert!((combined - (rrse + rae + (1.0 - cc.abs()))).abs() < 1e-12);
}

#[test]
fn test_statistic_display() {
    assert_eq!(format!("{}", Statistic::Accuracy), "Accuracy");
    assert_eq!(format!("{}", Statistic::RootMeanSquaredError), "RMSE");
}
