//! Non-personalized recommendations.
//!
//! None of these need training or history: they draw on the catalog alone,
//! plus the injected random source.

use crate::algorithm;
use crate::song::{Song, SongId};
use rand::seq::SliceRandom;
use rand::Rng;

/// Up to `limit` distinct ids drawn uniformly from `pool`.
pub fn sample_ids<R: Rng + ?Sized>(pool: &[SongId], limit: usize, rng: &mut R) -> Vec<SongId> {
    pool.choose_multiple(rng, limit).copied().collect()
}

/// Ranks the catalog by a random popularity score per song.
///
/// Stands in for play-count popularity until the catalog service exposes
/// engagement counts.
pub fn popular<R: Rng + ?Sized>(catalog: &[Song], limit: usize, rng: &mut R) -> Vec<SongId> {
    let scored = catalog
        .iter()
        .map(|song| (song.id(), rng.gen::<f64>()))
        .collect();
    algorithm::top_ids(scored, limit)
}

/// The catalog shuffled, cut to `limit`.
pub fn random<R: Rng + ?Sized>(catalog: &[Song], limit: usize, rng: &mut R) -> Vec<SongId> {
    let mut ids: Vec<SongId> = catalog.iter().map(Song::id).collect();
    ids.shuffle(rng);
    ids.truncate(limit);
    ids
}

/// First `limit` songs of `genre`, in catalog order.
#[must_use]
pub fn by_genre(catalog: &[Song], genre: &str, limit: usize) -> Vec<SongId> {
    catalog
        .iter()
        .filter(|song| song.genre() == genre)
        .take(limit)
        .map(Song::id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn catalog() -> Vec<Song> {
        (1..=6)
            .map(|i| {
                let genre = if i % 2 == 0 { "jazz" } else { "rock" };
                Song::new(i, format!("Song {i}"), "Artist", genre, 2000, 120.0, 0.5, 180)
                    .expect("valid song")
            })
            .collect()
    }

    #[test]
    fn test_sample_ids_distinct_and_bounded() {
        let pool = vec![1, 2, 3];
        let mut rng = StdRng::seed_from_u64(3);

        let sample = sample_ids(&pool, 10, &mut rng);
        assert_eq!(sample.len(), 3);
        assert_eq!(sample.iter().collect::<HashSet<_>>().len(), 3);
        assert!(sample_ids(&[], 4, &mut rng).is_empty());
    }

    #[test]
    fn test_popular_is_seeded() {
        let catalog = catalog();
        let first = popular(&catalog, 4, &mut StdRng::seed_from_u64(11));
        let second = popular(&catalog, 4, &mut StdRng::seed_from_u64(11));
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_random_is_a_permutation_prefix() {
        let catalog = catalog();
        let ids = random(&catalog, 10, &mut StdRng::seed_from_u64(2));
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_by_genre_keeps_catalog_order() {
        assert_eq!(by_genre(&catalog(), "jazz", 2), vec![2, 4]);
        assert!(by_genre(&catalog(), "metal", 2).is_empty());
    }
}
