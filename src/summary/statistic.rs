//! Ranking statistic definitions

use super::summary::EvaluationSummary;
use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar projection of an [`EvaluationSummary`] used for ranking
///
/// Each variant carries a fixed polarity so "best" means the same thing
/// regardless of whether the statistic measures quality or error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    /// Fraction of correctly classified records
    Accuracy,
    /// Cohen's kappa
    Kappa,
    /// Pearson correlation between actual and predicted
    CorrelationCoefficient,
    /// Mean absolute error
    MeanAbsoluteError,
    /// Root mean squared error
    RootMeanSquaredError,
    /// Absolute error relative to the prior baseline
    RelativeAbsoluteError,
    /// Rooted squared error relative to the prior baseline
    RootRelativeSquaredError,
    /// RRSE + RAE + (1 - |CC|), a combined regression rank
    CombinedError,
}

impl Statistic {
    /// Whether higher values are better for this statistic
    pub fn higher_is_better(&self) -> bool {
        matches!(
            self,
            Statistic::Accuracy | Statistic::Kappa | Statistic::CorrelationCoefficient
        )
    }

    /// Get statistic name as string
    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Accuracy => "Accuracy",
            Statistic::Kappa => "Kappa",
            Statistic::CorrelationCoefficient => "CC",
            Statistic::MeanAbsoluteError => "MAE",
            Statistic::RootMeanSquaredError => "RMSE",
            Statistic::RelativeAbsoluteError => "RAE",
            Statistic::RootRelativeSquaredError => "RRSE",
            Statistic::CombinedError => "RRSE+RAE+(1-|CC|)",
        }
    }

    /// Project the scalar value out of a summary
    ///
    /// Fails with a `Data` error when the statistic does not apply to the
    /// summary's target kind or is undefined for its contents.
    pub fn project(&self, summary: &EvaluationSummary) -> Result<f64> {
        let value = match self {
            Statistic::Accuracy => summary.accuracy(),
            Statistic::Kappa => summary.kappa(),
            Statistic::CorrelationCoefficient => summary.correlation_coefficient(),
            Statistic::MeanAbsoluteError => summary.mean_absolute_error(),
            Statistic::RootMeanSquaredError => summary.root_mean_squared_error(),
            Statistic::RelativeAbsoluteError => summary.relative_absolute_error(),
            Statistic::RootRelativeSquaredError => summary.root_relative_squared_error(),
            Statistic::CombinedError => {
                match (
                    summary.root_relative_squared_error(),
                    summary.relative_absolute_error(),
                    summary.correlation_coefficient(),
                ) {
                    (Some(rrse), Some(rae), Some(cc)) => Some(rrse + rae + (1.0 - cc.abs())),
                    _ => None,
                }
            }
        };
        value.ok_or_else(|| {
            EvalError::Data(format!(
                "Statistic {} is not defined for this summary",
                self.name()
            ))
        })
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
