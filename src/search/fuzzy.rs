//! Typo-tolerant search using Levenshtein edit distance.
//!
//! Every call scans the whole catalog; nothing is cached between calls.

use crate::song::{Song, SongId};
use rayon::prelude::*;

/// Minimum number of single-character insertions, deletions and
/// substitutions turning `a` into `b`. Compares by `char`.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // dp[i][j]: distance between the first i chars of a and the first j of b.
    let mut dp = vec![vec![0_usize; b.len() + 1]; a.len() + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in dp[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            dp[i][j] = if a[i - 1] == b[j - 1] {
                dp[i - 1][j - 1]
            } else {
                1 + dp[i - 1][j - 1].min(dp[i - 1][j]).min(dp[i][j - 1])
            };
        }
    }

    dp[a.len()][b.len()]
}

/// Songs whose lowercased title or artist is within `max_distance` edits of
/// the lowercased `query`. Catalog order.
#[must_use]
pub fn fuzzy_search(catalog: &[Song], query: &str, max_distance: usize) -> Vec<SongId> {
    let query = query.to_lowercase();
    let matches: Vec<SongId> = catalog
        .par_iter()
        .filter(|song| {
            levenshtein(&query, &song.title().to_lowercase()) <= max_distance
                || levenshtein(&query, &song.artist().to_lowercase()) <= max_distance
        })
        .map(Song::id)
        .collect();

    log::debug!("Fuzzy search `{query}' (max distance {max_distance}): {} matches", matches.len());
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn song(id: SongId, title: &str, artist: &str) -> Song {
        Song::new(id, title, artist, "pop", 2000, 120.0, 0.5, 180).expect("valid song")
    }

    fn random_word<R: Rng>(rng: &mut R) -> String {
        let len = rng.gen_range(0..6);
        (0..len).map(|_| rng.gen_range(b'a'..=b'c') as char).collect()
    }

    #[test]
    fn test_known_distances() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("tst", "test"), 1);
        assert_eq!(levenshtein("tst", "testing"), 4);
        assert_eq!(levenshtein("café", "cafe"), 1);
    }

    #[test]
    fn test_metric_properties() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..200 {
            let (a, b, c) = (random_word(&mut rng), random_word(&mut rng), random_word(&mut rng));

            assert_eq!(levenshtein(&a, &a), 0);
            assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
            assert!(
                levenshtein(&a, &c) <= levenshtein(&a, &b) + levenshtein(&b, &c),
                "triangle inequality failed for {a:?} {b:?} {c:?}"
            );
        }
    }

    #[test]
    fn test_fuzzy_search_thresholds() {
        let catalog = vec![song(1, "Test", "Someone"), song(2, "Testing", "Someone Else")];
        assert_eq!(fuzzy_search(&catalog, "tst", 1), vec![1]);
        assert_eq!(fuzzy_search(&catalog, "TST", 4), vec![1, 2]);
        assert!(fuzzy_search(&catalog, "zzzz", 1).is_empty());
    }

    #[test]
    fn test_fuzzy_search_matches_artist() {
        let catalog = vec![song(1, "Untitled", "Bjork"), song(2, "Other", "Blur")];
        assert_eq!(fuzzy_search(&catalog, "bjrk", 1), vec![1]);
        assert!(fuzzy_search(&[], "bjrk", 1).is_empty());
    }
}
