//! The recommendation and search entry points, over one loaded dataset.
//!
//! Ratings, the interaction graph and the factor model are rebuilt on every
//! call from the dataset, so results always reflect the current data. The
//! search index is the only state kept between calls; it is rebuilt by
//! [`RecommendationEngine::build_search_index`] and swapped in atomically.

use crate::cluster::{self, ClusterConfig};
use crate::collaborative::CollaborativeFilter;
use crate::config::RuntimeConfig;
use crate::dataset::Dataset;
use crate::discovery;
use crate::error::{CoreError, Result};
use crate::factorization::{self, FactorizationConfig};
use crate::ratings;
use crate::search::{self, SearchIndex};
use crate::similarity;
use crate::song::{InteractionEvent, MembershipEdge, Song, SongId, UserId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
pub struct RecommendationEngine {
    catalog: Vec<Song>,
    memberships: Vec<MembershipEdge>,
    interactions: Vec<InteractionEvent>,
    index: SearchIndex,
    rng: Mutex<StdRng>,
    factorization: FactorizationConfig,
    cluster: ClusterConfig,
}

impl RecommendationEngine {
    /// Takes ownership of `dataset` and builds the initial search index.
    ///
    /// # Errors
    ///
    /// [`CoreError::DataIntegrity`] if two songs share an id.
    pub fn new(dataset: Dataset, config: &RuntimeConfig) -> Result<Self> {
        let mut ids = HashSet::with_capacity(dataset.songs.len());
        if let Some(duplicate) = dataset.songs.iter().find(|song| !ids.insert(song.id())) {
            return Err(CoreError::data_integrity(duplicate.id(), "duplicate song id"));
        }

        let engine = Self {
            catalog: dataset.songs,
            memberships: dataset.memberships,
            interactions: dataset.interactions,
            index: SearchIndex::new(),
            rng: Mutex::new(StdRng::seed_from_u64(config.seed)),
            factorization: config.factorization.clone(),
            cluster: config.cluster.clone(),
        };
        engine.build_search_index();
        Ok(engine)
    }

    #[must_use]
    pub fn catalog(&self) -> &[Song] {
        &self.catalog
    }

    #[must_use]
    pub fn song(&self, song_id: SongId) -> Option<&Song> {
        self.catalog.iter().find(|song| song.id() == song_id)
    }

    /// Resolves ids to songs, skipping any that aren't in the catalog.
    #[must_use]
    pub fn songs(&self, ids: &[SongId]) -> Vec<&Song> {
        ids.iter().filter_map(|id| self.song(*id)).collect()
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn catalog_ids(&self) -> Vec<SongId> {
        self.catalog.iter().map(Song::id).collect()
    }

    /// Songs the user is tied to through a playlist or any interaction.
    fn associated_songs(&self, user_id: UserId) -> BTreeSet<SongId> {
        self.memberships
            .iter()
            .filter(|edge| edge.user_id == user_id)
            .map(|edge| edge.song_id)
            .chain(
                self.interactions
                    .iter()
                    .filter(|event| event.user_id == user_id)
                    .map(|event| event.song_id),
            )
            .collect()
    }

    /// Collaborative-filtering recommendations.
    ///
    /// Only catalog songs are recommended. Users without graph history, or
    /// whose neighbours offer no catalog song, get up to `limit` random
    /// catalog songs they aren't tied to yet.
    #[must_use]
    pub fn recommend_cf(&self, user_id: UserId, limit: usize) -> Vec<SongId> {
        let graph = ratings::build_graph(&self.memberships, &self.interactions);
        let skipped = ratings::skipped_songs(&self.interactions, user_id);

        let associated = self.associated_songs(user_id);
        let fallback_pool: Vec<SongId> = self
            .catalog
            .iter()
            .map(Song::id)
            .filter(|id| !associated.contains(id))
            .collect();

        let catalog: BTreeSet<SongId> = self.catalog.iter().map(Song::id).collect();
        let filter = CollaborativeFilter::new(&graph, &skipped).within(&catalog);
        let recommended = filter.recommend(user_id, limit, &fallback_pool, &mut *self.rng());
        log::debug!("CF recommended {} songs for user `{user_id}'", recommended.len());
        recommended
    }

    /// Matrix-factorization recommendations. Trains a fresh model per call;
    /// users absent from the ratings get nothing.
    #[must_use]
    pub fn recommend_mf(&self, user_id: UserId, limit: usize) -> Vec<SongId> {
        let ratings = ratings::build_ratings(&self.memberships, &self.interactions);
        if !ratings.contains_key(&user_id) {
            log::debug!("No ratings for user `{user_id}', skipping training");
            return Vec::new();
        }

        // Training gets its own generator so the shared one isn't locked for every epoch.
        let mut rng = StdRng::seed_from_u64(self.rng().gen());
        let model = factorization::train(&ratings, &self.factorization, &mut rng);
        let skipped = ratings::skipped_songs(&self.interactions, user_id);
        let recommended = factorization::recommend(&model, &ratings, &skipped, &self.catalog_ids(), user_id, limit);
        log::debug!("MF recommended {} songs for user `{user_id}'", recommended.len());
        recommended
    }

    /// Up to `k` representative songs of `genre`, chosen by clustering.
    #[must_use]
    pub fn recommend_genre(&self, genre: &str, k: usize) -> Vec<SongId> {
        cluster::cluster_genre(&self.catalog, genre, k, &self.cluster, &mut *self.rng())
            .iter()
            .map(Song::id)
            .collect()
    }

    /// Songs most similar in content to `seed_id`.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] if the catalog is non-empty and lacks `seed_id`.
    pub fn recommend_similar(&self, seed_id: SongId, limit: usize) -> Result<Vec<SongId>> {
        let similar = similarity::similar(&self.catalog, seed_id, limit)?;
        Ok(similar.iter().map(Song::id).collect())
    }

    /// Songs ranked by (randomized) popularity.
    #[must_use]
    pub fn recommend_popular(&self, limit: usize) -> Vec<SongId> {
        discovery::popular(&self.catalog, limit, &mut *self.rng())
    }

    #[must_use]
    pub fn recommend_random(&self, limit: usize) -> Vec<SongId> {
        discovery::random(&self.catalog, limit, &mut *self.rng())
    }

    #[must_use]
    pub fn recommend_by_genre(&self, genre: &str, limit: usize) -> Vec<SongId> {
        discovery::by_genre(&self.catalog, genre, limit)
    }

    /// Rebuilds the autocomplete index from the current catalog.
    pub fn build_search_index(&self) {
        self.index.rebuild(&self.catalog);
    }

    #[must_use]
    pub fn autocomplete(&self, prefix: &str) -> Vec<SongId> {
        self.index.autocomplete(prefix)
    }

    #[must_use]
    pub fn fuzzy_search(&self, query: &str, max_distance: usize) -> Vec<SongId> {
        search::fuzzy_search(&self.catalog, query, max_distance)
    }

    /// Case-insensitive substring match on title, artist or genre.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SongId> {
        search::substring_search(&self.catalog, query)
    }
}
