//! Ranking of evaluated candidates
//!
//! Orders composite summaries by a chosen statistic with deterministic
//! tie-breaking and top-N selection.

mod ranker;


pub use ranker::{rank, RankedCandidate, RankingOutcome, FULL_RANKING};
