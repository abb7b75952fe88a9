//! Aggregation of per-fold summaries into one composite

use super::summary::EvaluationSummary;
use crate::error::{EvalError, Result};

/// Accumulator combining independent evaluation summaries
///
/// Summaries must originate from compatible target schemas; the composite
/// statistics are order-independent.
#[derive(Clone, Debug, Default)]
pub struct AggregateSummaries {
    aggregated: Option<EvaluationSummary>,
    count: usize,
}

impl AggregateSummaries {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of summaries added so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// Add one summary
    pub fn add(&mut self, summary: EvaluationSummary) -> Result<()> {
        match &mut self.aggregated {
            None => self.aggregated = Some(summary),
            Some(base) => base.merge(summary)?,
        }
        self.count += 1;
        Ok(())
    }

    /// The composite summary
    ///
    /// Fails with a `Data` error when nothing was added.
    pub fn aggregated(self) -> Result<EvaluationSummary> {
        self.aggregated
            .ok_or_else(|| EvalError::Data("No summaries to aggregate".to_string()))
    }
}

/// Aggregate a sequence of summaries into one composite
pub fn aggregate<I>(summaries: I) -> Result<EvaluationSummary>
where
    I: IntoIterator<Item = EvaluationSummary>,
{
    let mut acc = AggregateSummaries::new();
    for summary in summaries {
        acc.add(summary)?;
    }
    acc.aggregated()
}
