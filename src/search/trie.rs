//! Prefix index over lowercased song titles and artist names.
//!
//! [`Trie`] is immutable once built. [`SearchIndex`] owns the current trie
//! and replaces it wholesale on rebuild, so readers always see either the old
//! index or the new one, never a half-built one.

use crate::song::{Song, SongId};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Default, Clone, PartialEq)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    terminal: bool,
    song_ids: BTreeSet<SongId>,
}

/// Character trie mapping lowercased keys to song ids.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Trie {
    root: TrieNode,
    keys: usize,
}

impl Trie {
    /// Indexes every song under its lowercased title and its lowercased artist.
    #[must_use]
    pub fn build(catalog: &[Song]) -> Self {
        let mut trie = Self::default();
        for song in catalog {
            trie.insert(&song.title().to_lowercase(), song.id());
            trie.insert(&song.artist().to_lowercase(), song.id());
        }
        log::debug!("Built search trie: {} songs, {} keys", catalog.len(), trie.keys);
        trie
    }

    fn insert(&mut self, key: &str, song_id: SongId) {
        let mut node = &mut self.root;
        for c in key.chars() {
            node = node.children.entry(c).or_default();
        }
        if !node.terminal {
            node.terminal = true;
            self.keys += 1;
        }
        node.song_ids.insert(song_id);
    }

    /// Distinct keys indexed.
    #[must_use]
    pub fn keys(&self) -> usize {
        self.keys
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys == 0
    }

    /// Ids of every song with a title or artist starting with `prefix`
    /// (case-insensitive).
    ///
    /// Ids are collected by a pre-order walk of the prefix's subtree, children
    /// in character order, each id reported once. The order follows the walk,
    /// not relevance. Unknown prefixes give an empty result.
    #[must_use]
    pub fn autocomplete(&self, prefix: &str) -> Vec<SongId> {
        let mut node = &self.root;
        for c in prefix.to_lowercase().chars() {
            match node.children.get(&c) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }

        let mut seen = HashSet::new();
        let mut suggestions = Vec::new();
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            for song_id in &node.song_ids {
                if seen.insert(*song_id) {
                    suggestions.push(*song_id);
                }
            }
            // Reversed so the smallest character is popped first.
            stack.extend(node.children.values().rev());
        }
        suggestions
    }

    /// Ids stored exactly at `key` (case-insensitive).
    #[must_use]
    pub fn exact(&self, key: &str) -> Option<&BTreeSet<SongId>> {
        let mut node = &self.root;
        for c in key.to_lowercase().chars() {
            node = node.children.get(&c)?;
        }
        node.terminal.then_some(&node.song_ids)
    }
}

/// Shared, rebuildable autocomplete index.
#[derive(Debug, Default)]
pub struct SearchIndex {
    current: RwLock<Arc<Trie>>,
}

impl SearchIndex {
    /// An empty index; call [`SearchIndex::rebuild`] to fill it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fresh trie from `catalog` and swaps it in.
    ///
    /// The build happens outside the lock; the write lock is only held for
    /// the pointer swap.
    pub fn rebuild(&self, catalog: &[Song]) {
        let trie = Arc::new(Trie::build(catalog));
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = trie;
        log::info!("Search index rebuilt with {} songs", catalog.len());
    }

    /// The trie currently being served.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Trie> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*current)
    }

    #[must_use]
    pub fn autocomplete(&self, prefix: &str) -> Vec<SongId> {
        self.snapshot().autocomplete(prefix)
    }
}
