//! Recommendation and search core for a music catalog.
//!
//! Turns catalog metadata, playlist membership and interaction logs into
//! ranked song lists and searchable indexes. Everything runs in memory; the
//! loaders in [`dataset`] and [`db`] only read.
//!
//! Core modules:
//! - [`ratings`] - Implicit ratings and the user/song interaction graph
//! - [`collaborative`] - Jaccard user-similarity recommender
//! - [`factorization`] - Latent-factor model trained with SGD
//! - [`similarity`] - Content similarity between songs
//! - [`cluster`] - Genre-representative selection (k-medoids)
//! - [`search`] - Trie autocomplete, Levenshtein fuzzy matching, substring search
//! - [`engine`] - All of the above behind one facade
//!
//! ### Supporting Modules
//!
//! - [`song`] - Validated catalog records and interaction events
//! - [`dataset`], [`db`] - JSON and SQLite loaders
//! - [`discovery`] - Popular, random and genre-filtered picks
//! - [`algorithm`] - Shared ranking helpers
//! - [`config`] - Runtime configuration and data directory
//! - [`cli`], [`completion`] - Command-line interface and shell completion
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use cadence::config::RuntimeConfig;
//! use cadence::dataset::Dataset;
//! use cadence::engine::RecommendationEngine;
//! use std::path::Path;
//!
//! let dataset = Dataset::load(Path::new("catalog.json"))?;
//! let engine = RecommendationEngine::new(dataset, &RuntimeConfig::default())?;
//!
//! let for_user = engine.recommend_cf(3, 10);
//! let like_this = engine.recommend_similar(12, 5)?;
//! let typed = engine.fuzzy_search("bohemain rapsody", 3);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Determinism
//!
//! Every random choice (factor initialization, cluster seeds, fallbacks) is
//! drawn from one seeded generator, and every ranking breaks score ties by
//! ascending song id. The same dataset, config and seed give the same output.

pub mod algorithm;
pub mod cli;
pub mod cluster;
pub mod collaborative;
pub mod completion;
pub mod config;
pub mod dataset;
pub mod db;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod factorization;
pub mod ratings;
pub mod search;
pub mod similarity;
pub mod song;
