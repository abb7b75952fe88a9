//! Accumulated scoring statistics for one train/test pass

use crate::error::{EvalError, Result};
use crate::model::Prediction;
use std::fmt;

/// One recorded prediction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictionRecord {
    /// Row position within the scored test set
    pub row: usize,
    /// Actual target value
    pub actual: Prediction,
    /// Predicted target value
    pub predicted: Prediction,
}

/// Confusion counts for a nominal target, `matrix[actual][predicted]`
#[derive(Clone, Debug, PartialEq)]
struct NominalScores {
    labels: Vec<String>,
    matrix: Vec<Vec<usize>>,
}

/// Additive sums for a numeric target
///
/// Prior sums accumulate the error of predicting the train-set target mean,
/// the baseline for relative error statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct NumericScores {
    n: usize,
    sum_abs_err: f64,
    sum_sq_err: f64,
    sum_prior_abs_err: f64,
    sum_prior_sq_err: f64,
    sum_actual: f64,
    sum_predicted: f64,
    sum_actual_sq: f64,
    sum_predicted_sq: f64,
    sum_cross: f64,
}

#[derive(Clone, Debug, PartialEq)]
enum TargetScores {
    Nominal(NominalScores),
    Numeric(NumericScores),
}

/// Accumulated scoring statistics for one train/test pass
///
/// All aggregate counts are additive, so merging two summaries built from
/// the same target schema is commutative and associative. Per-record
/// predictions are kept unless discarded to conserve memory; a merge where
/// either side discarded them yields a composite without predictions.
#[derive(Clone, Debug)]
pub struct EvaluationSummary {
    scores: TargetScores,
    predictions: Option<Vec<PredictionRecord>>,
}

impl EvaluationSummary {
    /// Create a summary for a nominal target with the given label set
    pub fn nominal(labels: Vec<String>) -> Self {
        let n = labels.len();
        Self {
            scores: TargetScores::Nominal(NominalScores {
                labels,
                matrix: vec![vec![0; n]; n],
            }),
            predictions: Some(Vec::new()),
        }
    }

    /// Create a summary for a numeric target
    pub fn numeric() -> Self {
        Self {
            scores: TargetScores::Numeric(NumericScores::default()),
            predictions: Some(Vec::new()),
        }
    }

    /// Discard per-record predictions to conserve memory
    ///
    /// Aggregate counts still accumulate and merge; the raw predictions
    /// cannot be regained later.
    pub fn without_predictions(mut self) -> Self {
        self.predictions = None;
        self
    }

    /// Whether this summary scores a nominal target
    pub fn is_nominal(&self) -> bool {
        matches!(self.scores, TargetScores::Nominal(_))
    }

    /// Record one nominal prediction
    pub fn push_nominal(&mut self, row: usize, actual: usize, predicted: usize) -> Result<()> {
        let scores = match &mut self.scores {
            TargetScores::Nominal(s) => s,
            TargetScores::Numeric(_) => {
                return Err(EvalError::Data(
                    "Cannot record a nominal prediction against a numeric target".to_string(),
                ))
            }
        };
        let n = scores.labels.len();
        if actual >= n || predicted >= n {
            return Err(EvalError::Data(format!(
                "Class index out of range: actual {}, predicted {}, {} labels",
                actual, predicted, n
            )));
        }
        scores.matrix[actual][predicted] += 1;
        if let Some(preds) = &mut self.predictions {
            preds.push(PredictionRecord {
                row,
                actual: Prediction::Nominal(actual),
                predicted: Prediction::Nominal(predicted),
            });
        }
        Ok(())
    }

    /// Record one numeric prediction
    ///
    /// `prior` is the train-set target mean, the baseline prediction for
    /// relative error statistics.
    pub fn push_numeric(&mut self, row: usize, actual: f64, predicted: f64, prior: f64) -> Result<()> {
        let scores = match &mut self.scores {
            TargetScores::Numeric(s) => s,
            TargetScores::Nominal(_) => {
                return Err(EvalError::Data(
                    "Cannot record a numeric prediction against a nominal target".to_string(),
                ))
            }
        };
        scores.n += 1;
        scores.sum_abs_err += (predicted - actual).abs();
        scores.sum_sq_err += (predicted - actual).powi(2);
        scores.sum_prior_abs_err += (prior - actual).abs();
        scores.sum_prior_sq_err += (prior - actual).powi(2);
        scores.sum_actual += actual;
        scores.sum_predicted += predicted;
        scores.sum_actual_sq += actual * actual;
        scores.sum_predicted_sq += predicted * predicted;
        scores.sum_cross += actual * predicted;
        if let Some(preds) = &mut self.predictions {
            preds.push(PredictionRecord {
                row,
                actual: Prediction::Numeric(actual),
                predicted: Prediction::Numeric(predicted),
            });
        }
        Ok(())
    }

    /// Merge another summary built from the same target schema into this one
    ///
    /// Commutative and associative over all aggregate counts. Fails with
    /// `SchemaMismatch` when target kinds or label sets differ.
    pub fn merge(&mut self, other: EvaluationSummary) -> Result<()> {
        match (&mut self.scores, other.scores) {
            (TargetScores::Nominal(a), TargetScores::Nominal(b)) => {
                if a.labels != b.labels {
                    return Err(EvalError::SchemaMismatch(format!(
                        "Label sets differ: [{}] vs [{}]",
                        a.labels.join(", "),
                        b.labels.join(", ")
                    )));
                }
                for (row_a, row_b) in a.matrix.iter_mut().zip(b.matrix) {
                    for (cell_a, cell_b) in row_a.iter_mut().zip(row_b) {
                        *cell_a += cell_b;
                    }
                }
            }
            (TargetScores::Numeric(a), TargetScores::Numeric(b)) => {
                a.n += b.n;
                a.sum_abs_err += b.sum_abs_err;
                a.sum_sq_err += b.sum_sq_err;
                a.sum_prior_abs_err += b.sum_prior_abs_err;
                a.sum_prior_sq_err += b.sum_prior_sq_err;
                a.sum_actual += b.sum_actual;
                a.sum_predicted += b.sum_predicted;
                a.sum_actual_sq += b.sum_actual_sq;
                a.sum_predicted_sq += b.sum_predicted_sq;
                a.sum_cross += b.sum_cross;
            }
            _ => {
                return Err(EvalError::SchemaMismatch(
                    "Cannot merge summaries of nominal and numeric targets".to_string(),
                ))
            }
        }
        self.predictions = match (self.predictions.take(), other.predictions) {
            (Some(mut a), Some(b)) => {
                a.extend(b);
                Some(a)
            }
            _ => None,
        };
        Ok(())
    }

    /// Number of scored records
    pub fn num_instances(&self) -> usize {
        match &self.scores {
            TargetScores::Nominal(s) => s.matrix.iter().flatten().sum(),
            TargetScores::Numeric(s) => s.n,
        }
    }

    /// Recorded predictions, `None` when discarded
    pub fn predictions(&self) -> Option<&[PredictionRecord]> {
        self.predictions.as_deref()
    }

    /// Target labels of a nominal summary
    pub fn labels(&self) -> Option<&[String]> {
        match &self.scores {
            TargetScores::Nominal(s) => Some(&s.labels),
            TargetScores::Numeric(_) => None,
        }
    }

    /// Confusion count at `[actual][predicted]`
    pub fn confusion(&self, actual: usize, predicted: usize) -> Option<usize> {
        match &self.scores {
            TargetScores::Nominal(s) => s.matrix.get(actual)?.get(predicted).copied(),
            TargetScores::Numeric(_) => None,
        }
    }

    /// Correctly classified count (nominal targets)
    pub fn correct(&self) -> Option<usize> {
        match &self.scores {
            TargetScores::Nominal(s) => {
                Some((0..s.labels.len()).map(|i| s.matrix[i][i]).sum())
            }
            TargetScores::Numeric(_) => None,
        }
    }

    /// Incorrectly classified count (nominal targets)
    pub fn incorrect(&self) -> Option<usize> {
        Some(self.num_instances() - self.correct()?)
    }

    /// Fraction of correctly classified records (nominal targets)
    pub fn accuracy(&self) -> Option<f64> {
        let correct = self.correct()?;
        let total = self.num_instances();
        if total == 0 {
            return Some(0.0);
        }
        Some(correct as f64 / total as f64)
    }

    /// Cohen's kappa (nominal targets)
    pub fn kappa(&self) -> Option<f64> {
        let scores = match &self.scores {
            TargetScores::Nominal(s) => s,
            TargetScores::Numeric(_) => return None,
        };
        let total = self.num_instances();
        if total == 0 {
            return Some(0.0);
        }
        let n = total as f64;
        let observed = self.accuracy()?;
        let mut expected = 0.0;
        for c in 0..scores.labels.len() {
            let row: usize = scores.matrix[c].iter().sum();
            let col: usize = scores.matrix.iter().map(|r| r[c]).sum();
            expected += (row as f64 / n) * (col as f64 / n);
        }
        if (1.0 - expected).abs() < f64::EPSILON {
            return Some(0.0);
        }
        Some((observed - expected) / (1.0 - expected))
    }

    /// Mean absolute error (numeric targets)
    pub fn mean_absolute_error(&self) -> Option<f64> {
        let s = self.numeric_scores()?;
        if s.n == 0 {
            return Some(0.0);
        }
        Some(s.sum_abs_err / s.n as f64)
    }

    /// Root mean squared error (numeric targets)
    pub fn root_mean_squared_error(&self) -> Option<f64> {
        let s = self.numeric_scores()?;
        if s.n == 0 {
            return Some(0.0);
        }
        Some((s.sum_sq_err / s.n as f64).sqrt())
    }

    /// Absolute error relative to the prior baseline (numeric targets)
    ///
    /// `None` when the baseline error is zero (constant target).
    pub fn relative_absolute_error(&self) -> Option<f64> {
        let s = self.numeric_scores()?;
        if s.sum_prior_abs_err == 0.0 {
            return None;
        }
        Some(s.sum_abs_err / s.sum_prior_abs_err)
    }

    /// Squared error relative to the prior baseline, rooted (numeric targets)
    pub fn root_relative_squared_error(&self) -> Option<f64> {
        let s = self.numeric_scores()?;
        if s.sum_prior_sq_err == 0.0 {
            return None;
        }
        Some((s.sum_sq_err / s.sum_prior_sq_err).sqrt())
    }

    /// Pearson correlation between actual and predicted (numeric targets)
    ///
    /// Degenerate variance yields 0.
    pub fn correlation_coefficient(&self) -> Option<f64> {
        let s = self.numeric_scores()?;
        if s.n == 0 {
            return Some(0.0);
        }
        let n = s.n as f64;
        let var_actual = n * s.sum_actual_sq - s.sum_actual * s.sum_actual;
        let var_predicted = n * s.sum_predicted_sq - s.sum_predicted * s.sum_predicted;
        let denominator = (var_actual * var_predicted).sqrt();
        if denominator <= 0.0 {
            return Some(0.0);
        }
        Some((n * s.sum_cross - s.sum_actual * s.sum_predicted) / denominator)
    }

    fn numeric_scores(&self) -> Option<&NumericScores> {
        match &self.scores {
            TargetScores::Numeric(s) => Some(s),
            TargetScores::Nominal(_) => None,
        }
    }
}

impl fmt::Display for EvaluationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Instances: {}", self.num_instances())?;
        match &self.scores {
            TargetScores::Nominal(_) => {
                if let (Some(acc), Some(kappa)) = (self.accuracy(), self.kappa()) {
                    writeln!(f, "Accuracy:  {:.4}", acc)?;
                    writeln!(f, "Kappa:     {:.4}", kappa)?;
                }
            }
            TargetScores::Numeric(_) => {
                if let (Some(mae), Some(rmse), Some(cc)) = (
                    self.mean_absolute_error(),
                    self.root_mean_squared_error(),
                    self.correlation_coefficient(),
                ) {
                    writeln!(f, "MAE:       {:.4}", mae)?;
                    writeln!(f, "RMSE:      {:.4}", rmse)?;
                    writeln!(f, "Corr:      {:.4}", cc)?;
                }
            }
        }
        Ok(())
    }
}
