//! # Cadence
//!
//! Command-line front end for the recommendation and search core.
//!
//! ```bash
//! # Songs close to song 12
//! cadence --data catalog.json similar 12
//!
//! # Collaborative filtering for user 3 from an SQLite dump
//! cadence --data music.db cf 3
//!
//! # Representative jazz songs, reproducible
//! cadence --seed 7 genre jazz -k 4
//! ```
//!
//! Logging is controlled via `RUST_LOG`, e.g. `RUST_LOG=cadence=debug`.

use anyhow::{Context, Result};
use cadence::cli::{self, Command};
use cadence::completion;
use cadence::config::{self, RuntimeConfig};
use cadence::dataset::Dataset;
use cadence::engine::RecommendationEngine;
use cadence::song::{Song, SongId};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use std::env;

fn print_songs(engine: &RecommendationEngine, ids: &[SongId]) {
    if ids.is_empty() {
        println!("No songs found.");
        return;
    }
    for song in engine.songs(ids) {
        print_song(song);
    }
}

fn print_song(song: &Song) {
    println!(
        "{:>6}  {} - {}  [{}, {}, {:.0} bpm, energy {:.2}]",
        song.id(),
        song.artist(),
        song.title(),
        song.genre(),
        song.release_year(),
        song.tempo(),
        song.energy()
    );
}

fn load_config(args: &cli::Args) -> Result<RuntimeConfig> {
    let mut config = match &args.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };

    if let Some(data) = &args.data {
        let cwd = env::current_dir().context("Failed to read current directory")?;
        config = config.with_data_path(config::resolve_path(data, &cwd)?);
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn load_engine(config: &RuntimeConfig) -> Result<RecommendationEngine> {
    let data_path = config.data_path()?;
    info!("Loading dataset from {}", data_path.display());
    let dataset = Dataset::load(&data_path)?;
    RecommendationEngine::new(dataset, config)
        .with_context(|| format!("Dataset `{}' is inconsistent", data_path.display()))
}

/// Main entry point for the Cadence CLI.
///
/// # Logging
///
/// - `RUST_LOG=debug cadence mf 3` - Enable debug logging
/// - `RUST_LOG=cadence::factorization=trace cadence mf 3` - Per-epoch training error
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    // Completion scripts don't need a dataset.
    if let Command::Completion { shell } = args.command {
        let mut cmd = cli::Args::command();
        completion::generate_completions(completion::shell_to_completion_shell(shell), &mut cmd);
        return Ok(());
    }

    let config = load_config(&args)?;
    debug!("Runtime config: {config:?}");
    let engine = load_engine(&config)?;

    match args.command {
        Command::List => {
            for song in engine.catalog() {
                print_song(song);
            }
        }
        Command::Similar { song_id, limit } => {
            let ids = engine.recommend_similar(song_id, limit)?;
            print_songs(&engine, &ids);
        }
        Command::Cf { user_id, limit } => print_songs(&engine, &engine.recommend_cf(user_id, limit)),
        Command::Mf { user_id, limit } => print_songs(&engine, &engine.recommend_mf(user_id, limit)),
        Command::Genre { genre, k } => print_songs(&engine, &engine.recommend_genre(&genre, k)),
        Command::Autocomplete { prefix } => print_songs(&engine, &engine.autocomplete(&prefix)),
        Command::Fuzzy { query, max_distance } => print_songs(&engine, &engine.fuzzy_search(&query, max_distance)),
        Command::Search { query } => print_songs(&engine, &engine.search(&query)),
        Command::Popular { limit } => print_songs(&engine, &engine.recommend_popular(limit)),
        Command::Random { limit } => print_songs(&engine, &engine.recommend_random(limit)),
        Command::CompleteSongs { prefix } => {
            for completion in completion::song_completions(&engine, &prefix) {
                println!("{}", completion::quote_for_shell(&completion));
            }
        }
        Command::Completion { .. } => unreachable!("handled before loading the dataset"),
    }

    Ok(())
}
