//! Content-based similarity between catalog songs.
//!
//! Compares songs on metadata alone: genre, energy, tempo and release year.
//! No history or training involved.

use crate::algorithm;
use crate::error::{CoreError, Result};
use crate::song::{Song, SongId};
use rayon::prelude::*;

const GENRE_WEIGHT: f64 = 0.4;
const ENERGY_WEIGHT: f64 = 0.3;
const TEMPO_WEIGHT: f64 = 0.2;
const YEAR_WEIGHT: f64 = 0.1;

/// Tempo difference (BPM) treated as completely dissimilar.
pub const TEMPO_RANGE: f64 = 200.0;
/// Release year difference treated as completely dissimilar.
pub const YEAR_RANGE: f64 = 100.0;

/// Weighted similarity in `[0, 1]`, 1.0 meaning identical features.
#[must_use]
pub fn content_similarity(a: &Song, b: &Song) -> f64 {
    let genre = if a.genre() == b.genre() { 1.0 } else { 0.0 };
    let energy = 1.0 - (a.energy() - b.energy()).abs();
    let tempo = 1.0 - ((a.tempo() - b.tempo()).abs() / TEMPO_RANGE).min(1.0);
    let year = 1.0 - (f64::from(a.release_year().abs_diff(b.release_year())) / YEAR_RANGE).min(1.0);

    GENRE_WEIGHT * genre + ENERGY_WEIGHT * energy + TEMPO_WEIGHT * tempo + YEAR_WEIGHT * year
}

/// Up to `limit` songs most similar to `seed_id`, best first, seed excluded.
///
/// An empty catalog yields an empty result.
///
/// # Errors
///
/// [`CoreError::NotFound`] if the catalog is non-empty and `seed_id` is not in it.
pub fn similar(catalog: &[Song], seed_id: SongId, limit: usize) -> Result<Vec<Song>> {
    if catalog.is_empty() {
        return Ok(Vec::new());
    }
    let seed = catalog
        .iter()
        .find(|song| song.id() == seed_id)
        .ok_or(CoreError::NotFound { song_id: seed_id })?;

    let scored: Vec<(SongId, f64)> = catalog
        .par_iter()
        .filter(|song| song.id() != seed_id)
        .map(|song| (song.id(), content_similarity(seed, song)))
        .collect();

    let ranked = algorithm::top_ids(scored, limit);
    log::debug!("Found {} songs similar to `{}'", ranked.len(), seed.title());

    Ok(ranked
        .into_iter()
        .filter_map(|id| catalog.iter().find(|song| song.id() == id).cloned())
        .collect())
}
