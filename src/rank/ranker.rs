//! Polarity-aware candidate ranking

use crate::error::{EvalError, Result};
use crate::summary::{EvaluationSummary, Statistic};
use std::cmp::Ordering;

/// `max` value requesting the full ranking
pub const FULL_RANKING: i32 = -1;

/// One ranked candidate: original index, composite summary, and the
/// projected statistic value
#[derive(Debug)]
pub struct RankedCandidate {
    /// Original candidate index
    pub index: usize,
    /// Projected scalar statistic
    pub value: f64,
    /// Composite evaluation summary
    pub summary: EvaluationSummary,
}

/// Result of ranking a batch: ordered winners plus per-candidate failures
///
/// Failed candidates are excluded from the ranking but reported, never
/// silently dropped.
#[derive(Debug, Default)]
pub struct RankingOutcome {
    /// Candidates ordered best first
    pub ranked: Vec<RankedCandidate>,
    /// Candidates whose evaluation failed, with the cause
    pub failures: Vec<(usize, EvalError)>,
}

/// Order evaluated candidates by a statistic, best first
///
/// The statistic's polarity is folded into the comparator, so "best" means
/// highest for quality statistics and lowest for error statistics. Ties
/// break on the lower original index, making the output deterministic.
/// `max == -1` returns the full ranking, `max >= 1` the top `max`;
/// `max == 0` is rejected.
pub fn rank(
    entries: Vec<(usize, EvaluationSummary)>,
    statistic: Statistic,
    max: i32,
) -> Result<Vec<RankedCandidate>> {
    if max == 0 || max < FULL_RANKING {
        return Err(EvalError::Configuration(format!(
            "Ranking max must be >= 1 or {} for the full ranking, got {}",
            FULL_RANKING, max
        )));
    }

    let mut ranked = Vec::with_capacity(entries.len());
    for (index, summary) in entries {
        let value = statistic.project(&summary)?;
        ranked.push(RankedCandidate {
            index,
            value,
            summary,
        });
    }

    let higher_is_better = statistic.higher_is_better();
    ranked.sort_by(|a, b| {
        let by_value = if higher_is_better {
            b.value.partial_cmp(&a.value)
        } else {
            a.value.partial_cmp(&b.value)
        };
        by_value
            .unwrap_or(Ordering::Equal)
            .then(a.index.cmp(&b.index))
    });

    if max != FULL_RANKING {
        ranked.truncate(max as usize);
    }
    Ok(ranked)
}
