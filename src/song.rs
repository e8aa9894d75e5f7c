//! Catalog records and interaction data, as supplied by the catalog service.
//!
//! A [`Song`] can only be built through [`Song::new`] (or deserialized, which
//! goes through the same checks), so every algorithm downstream can read its
//! fields without guarding against blanks or out-of-range values.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

pub type SongId = i64;
pub type UserId = i64;

/// An immutable, validated catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SongRecord", into = "SongRecord")]
pub struct Song {
    id: SongId,
    title: String,
    artist: String,
    genre: String,
    release_year: i32,
    /// Beats per minute.
    tempo: f64,
    /// Always within `[0, 1]`.
    energy: f64,
    /// Seconds.
    duration: i32,
}

/// Raw shape of a song as it arrives from the outside.
/// Converted to [`Song`] with validation; absent text fields are
/// reported as missing rather than failing to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongRecord {
    pub id: SongId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(alias = "releaseYear")]
    pub release_year: i32,
    pub tempo: f64,
    pub energy: f64,
    pub duration: i32,
}

impl Song {
    /// Validates and builds a song.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DataIntegrity`] if title, artist or genre is blank,
    /// tempo is not finite, or energy is outside `[0, 1]`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: SongId,
        title: impl Into<String>,
        artist: impl Into<String>,
        genre: impl Into<String>,
        release_year: i32,
        tempo: f64,
        energy: f64,
        duration: i32,
    ) -> Result<Self> {
        let title = title.into();
        let artist = artist.into();
        let genre = genre.into();

        for (field, value) in [("title", &title), ("artist", &artist), ("genre", &genre)] {
            if value.trim().is_empty() {
                return Err(CoreError::data_integrity(id, format!("{field} is blank")));
            }
        }
        if !tempo.is_finite() {
            return Err(CoreError::data_integrity(id, format!("tempo {tempo} is not finite")));
        }
        if !(0.0..=1.0).contains(&energy) {
            return Err(CoreError::data_integrity(id, format!("energy {energy} outside [0, 1]")));
        }

        log::trace!("Validated song `{id}' ({artist} - {title}).");
        Ok(Self {
            id,
            title,
            artist,
            genre,
            release_year,
            tempo,
            energy,
            duration,
        })
    }

    pub fn id(&self) -> SongId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn release_year(&self) -> i32 {
        self.release_year
    }

    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn duration(&self) -> i32 {
        self.duration
    }
}

impl TryFrom<SongRecord> for Song {
    type Error = CoreError;

    fn try_from(record: SongRecord) -> Result<Self> {
        let id = record.id;
        let required = |field: &str, value: Option<String>| {
            value.ok_or_else(|| CoreError::data_integrity(id, format!("{field} is missing")))
        };
        Song::new(
            id,
            required("title", record.title)?,
            required("artist", record.artist)?,
            required("genre", record.genre)?,
            record.release_year,
            record.tempo,
            record.energy,
            record.duration,
        )
    }
}

impl From<Song> for SongRecord {
    fn from(song: Song) -> Self {
        Self {
            id: song.id,
            title: Some(song.title),
            artist: Some(song.artist),
            genre: Some(song.genre),
            release_year: song.release_year,
            tempo: song.tempo,
            energy: song.energy,
            duration: song.duration,
        }
    }
}

/// A song sitting in one of the user's playlists.
/// Counts as an implicit positive rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MembershipEdge {
    #[serde(alias = "userId")]
    pub user_id: UserId,
    #[serde(alias = "songId")]
    pub song_id: SongId,
}

/// One playback event reported by a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionEvent {
    #[serde(alias = "userId")]
    pub user_id: UserId,
    #[serde(alias = "songId")]
    pub song_id: SongId,
    pub played: bool,
    pub completed: bool,
    pub skipped: bool,
    #[serde(alias = "skipPositionMs")]
    pub skip_position_ms: i64,
    #[serde(alias = "listenDurationMs")]
    pub listen_duration_ms: i64,
    #[serde(alias = "songDurationMs")]
    pub song_duration_ms: i64,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl InteractionEvent {
    /// Played through to the end.
    pub fn completed(user_id: UserId, song_id: SongId) -> Self {
        Self {
            user_id,
            song_id,
            played: true,
            completed: true,
            ..Self::default()
        }
    }

    /// Skipped at `position_ms` of a `duration_ms` long song.
    pub fn skipped(user_id: UserId, song_id: SongId, position_ms: i64, duration_ms: i64) -> Self {
        Self {
            user_id,
            song_id,
            played: true,
            skipped: true,
            skip_position_ms: position_ms,
            song_duration_ms: duration_ms,
            ..Self::default()
        }
    }

    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }
}
