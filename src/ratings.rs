//! Rating matrix and interaction graph construction.
//!
//! Both structures are derived fresh from playlist membership and interaction
//! events on every request; there is no incremental update.

use crate::song::{InteractionEvent, MembershipEdge, SongId, UserId};
use std::collections::{BTreeMap, BTreeSet};

/// `user -> (song -> rating)`. Iterates users ascending, then songs ascending.
pub type RatingMatrix = BTreeMap<UserId, BTreeMap<SongId, f64>>;

/// `user -> songs` the user has put in a playlist or listened to without skipping.
pub type InteractionGraph = BTreeMap<UserId, BTreeSet<SongId>>;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

/// Rating of a song sitting in one of the user's playlists.
const MEMBERSHIP_RATING: f64 = 1.0;
/// Starting point for a song the user only has events for.
const NEUTRAL_RATING: f64 = 0.5;
const COMPLETION_BONUS: f64 = 0.5;
/// Used when the event carries no song duration.
const FLAT_SKIP_PENALTY: f64 = 0.5;

/// Penalty for a skip, heavier the earlier in the song it happened.
#[must_use]
pub fn skip_penalty(event: &InteractionEvent) -> f64 {
    if event.song_duration_ms <= 0 {
        return FLAT_SKIP_PENALTY;
    }

    #[allow(clippy::cast_precision_loss)]
    let position = event.skip_position_ms as f64 / event.song_duration_ms as f64;
    match position {
        p if p < 0.2 => 0.7,
        p if p < 0.5 => 0.4,
        _ => 0.2,
    }
}

/// Builds the rating matrix.
///
/// Membership seeds a pair at 1.0, otherwise the first event seeds it at 0.5.
/// Events are then folded in chronological order (input order among equal
/// timestamps): a skip subtracts [`skip_penalty`], a completion adds 0.5, and
/// the rating is clamped to `[0, 5]` after every event.
#[must_use]
pub fn build_ratings(memberships: &[MembershipEdge], interactions: &[InteractionEvent]) -> RatingMatrix {
    let mut matrix = RatingMatrix::new();

    for edge in memberships {
        matrix
            .entry(edge.user_id)
            .or_default()
            .insert(edge.song_id, MEMBERSHIP_RATING);
    }

    for event in chronological(interactions) {
        let rating = matrix
            .entry(event.user_id)
            .or_default()
            .entry(event.song_id)
            .or_insert(NEUTRAL_RATING);
        *rating = apply_event(*rating, event);
    }

    log::debug!(
        "Built rating matrix: {} users, {} ratings",
        matrix.len(),
        matrix.values().map(BTreeMap::len).sum::<usize>()
    );
    matrix
}

fn apply_event(rating: f64, event: &InteractionEvent) -> f64 {
    let mut rating = rating;
    if event.skipped {
        rating -= skip_penalty(event);
    }
    if event.completed {
        rating += COMPLETION_BONUS;
    }
    rating.clamp(MIN_RATING, MAX_RATING)
}

fn chronological(interactions: &[InteractionEvent]) -> Vec<&InteractionEvent> {
    let mut events: Vec<&InteractionEvent> = interactions.iter().collect();
    // Stable, so equal timestamps keep input order.
    events.sort_by_key(|event| event.timestamp);
    events
}

/// Builds the user -> songs adjacency used by collaborative filtering.
#[must_use]
pub fn build_graph(memberships: &[MembershipEdge], interactions: &[InteractionEvent]) -> InteractionGraph {
    let listened = interactions
        .iter()
        .filter(|event| event.played && !event.skipped)
        .map(|event| (event.user_id, event.song_id));

    let mut graph = InteractionGraph::new();
    for (user_id, song_id) in memberships
        .iter()
        .map(|edge| (edge.user_id, edge.song_id))
        .chain(listened)
    {
        graph.entry(user_id).or_default().insert(song_id);
    }
    graph
}

/// Songs `user_id` has skipped at least once.
#[must_use]
pub fn skipped_songs(interactions: &[InteractionEvent], user_id: UserId) -> BTreeSet<SongId> {
    interactions
        .iter()
        .filter(|event| event.user_id == user_id && event.skipped)
        .map(|event| event.song_id)
        .collect()
}
