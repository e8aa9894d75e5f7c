//! Graph-based collaborative filtering.
//!
//! Users are compared by the Jaccard similarity of their song sets in the
//! [`InteractionGraph`]. Every song a similar user has and the target user
//! does not accumulates that similarity as its score. Songs outside the
//! catalog given to [`CollaborativeFilter::within`] are never scored.

use crate::algorithm::{self, penalize_skipped};
use crate::discovery;
use crate::ratings::InteractionGraph;
use crate::song::{SongId, UserId};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};

/// `|a ∩ b| / |a ∪ b|`, or `None` when both sets are empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn jaccard(a: &BTreeSet<SongId>, b: &BTreeSet<SongId>) -> Option<f64> {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    match union {
        0 => None,
        union => Some(intersection as f64 / union as f64),
    }
}

/// Collaborative filter over one snapshot of the interaction graph.
#[derive(Debug, Clone, Copy)]
pub struct CollaborativeFilter<'a> {
    graph: &'a InteractionGraph,
    skipped: &'a BTreeSet<SongId>,
    catalog: Option<&'a BTreeSet<SongId>>,
}

impl<'a> CollaborativeFilter<'a> {
    /// `skipped` holds the target user's skipped songs.
    #[must_use]
    pub fn new(graph: &'a InteractionGraph, skipped: &'a BTreeSet<SongId>) -> Self {
        Self {
            graph,
            skipped,
            catalog: None,
        }
    }

    /// Only songs in `catalog` become candidates. Graph edges to unknown
    /// songs still count towards user similarity.
    #[must_use]
    pub fn within(mut self, catalog: &'a BTreeSet<SongId>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    fn is_candidate(&self, song_id: SongId) -> bool {
        self.catalog.map_or(true, |catalog| catalog.contains(&song_id))
    }

    /// Accumulated similarity per candidate song, skip penalty applied to the
    /// totals. Empty when the user has no songs in the graph.
    #[must_use]
    pub fn scores(&self, user_id: UserId) -> BTreeMap<SongId, f64> {
        let Some(own) = self.graph.get(&user_id).filter(|songs| !songs.is_empty()) else {
            return BTreeMap::new();
        };

        let mut scores: BTreeMap<SongId, f64> = BTreeMap::new();
        for (other_id, other) in self.graph {
            if *other_id == user_id {
                continue;
            }
            let Some(similarity) = jaccard(own, other) else {
                continue;
            };
            log::trace!("Similarity between user `{user_id}' and `{other_id}': {similarity:.3}");

            for song_id in other.difference(own).filter(|id| self.is_candidate(**id)) {
                *scores.entry(*song_id).or_insert(0.0) += similarity;
            }
        }

        for (song_id, score) in &mut scores {
            *score = penalize_skipped(*score, self.skipped.contains(song_id));
        }
        scores
    }

    /// Top `limit` songs for `user_id`.
    ///
    /// Falls back to `limit` distinct songs drawn at random from
    /// `fallback_pool` when the user has no history or nothing scored.
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        user_id: UserId,
        limit: usize,
        fallback_pool: &[SongId],
        rng: &mut R,
    ) -> Vec<SongId> {
        let scores = self.scores(user_id);
        if scores.is_empty() {
            log::debug!("No collaborative signal for user `{user_id}', using random fallback");
            return discovery::sample_ids(fallback_pool, limit, rng);
        }

        algorithm::top_ids(scores.into_iter().collect(), limit)
    }
}
