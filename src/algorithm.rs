//! Ranking helpers shared by the recommenders.
//!
//! Every recommender ends the same way: a bag of `(song, score)` pairs is
//! ordered by score descending, ties broken by ascending song id, and cut to
//! `limit`. Keeping that in one place keeps the outputs comparable and
//! deterministic.

use crate::song::SongId;
use std::cmp::Ordering;

/// Score multiplier for songs the user has skipped before.
pub const SKIP_PENALTY_FACTOR: f64 = 0.3;

/// Orders by score descending, then song id ascending.
#[inline]
#[must_use]
pub fn by_score_then_id(a: &(SongId, f64), b: &(SongId, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

/// Sorts scored songs best-first.
#[must_use]
pub fn rank(mut scored: Vec<(SongId, f64)>) -> Vec<(SongId, f64)> {
    scored.sort_by(by_score_then_id);
    scored
}

/// Best `limit` song ids, best-first.
#[must_use]
pub fn top_ids(scored: Vec<(SongId, f64)>, limit: usize) -> Vec<SongId> {
    rank(scored)
        .into_iter()
        .take(limit)
        .map(|(song_id, _)| song_id)
        .collect()
}

/// Applies [`SKIP_PENALTY_FACTOR`] when `skipped` is set.
#[inline]
#[must_use]
pub fn penalize_skipped(score: f64, skipped: bool) -> f64 {
    match skipped {
        true => score * SKIP_PENALTY_FACTOR,
        false => score,
    }
}
