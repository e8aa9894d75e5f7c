//! Song search: prefix autocomplete, typo-tolerant matching and plain
//! substring search over titles and artists.

pub mod fuzzy;
pub mod trie;

pub use fuzzy::{fuzzy_search, levenshtein};
pub use trie::{SearchIndex, Trie};

use crate::song::{Song, SongId};

/// Songs whose title, artist or genre contains `query`, ignoring case.
/// Catalog order.
#[must_use]
pub fn substring_search(catalog: &[Song], query: &str) -> Vec<SongId> {
    let query = query.to_lowercase();
    catalog
        .iter()
        .filter(|song| {
            [song.title(), song.artist(), song.genre()]
                .iter()
                .any(|field| field.to_lowercase().contains(&query))
        })
        .map(Song::id)
        .collect()
}
