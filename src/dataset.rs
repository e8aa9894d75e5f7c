//! Everything the recommenders read: catalog, playlist membership and
//! interaction log, loaded together.
//!
//! JSON layout:
//!
//! ```json
//! {
//!   "songs": [{"id": 1, "title": "...", "artist": "...", "genre": "rock",
//!              "release_year": 1999, "tempo": 120.0, "energy": 0.8, "duration": 215}],
//!   "memberships": [{"user_id": 1, "song_id": 1}],
//!   "interactions": [{"user_id": 1, "song_id": 1, "played": true, "completed": true}]
//! }
//! ```
//!
//! `memberships` and `interactions` may be omitted. Songs are validated while
//! deserializing, so a file with a broken record is rejected as a whole.

use crate::song::{InteractionEvent, MembershipEdge, Song};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub songs: Vec<Song>,
    #[serde(default)]
    pub memberships: Vec<MembershipEdge>,
    #[serde(default)]
    pub interactions: Vec<InteractionEvent>,
}

impl Dataset {
    /// Reads a dataset from a JSON file.
    ///
    /// # Errors
    ///
    /// Fails if the file can't be read or isn't a valid dataset.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("Failed to read dataset `{}'", path.display()))?;
        let dataset: Self =
            serde_json::from_str(&raw).with_context(|| format!("Invalid dataset JSON in `{}'", path.display()))?;

        log::debug!(
            "Loaded `{}': {} songs, {} memberships, {} interactions",
            path.display(),
            dataset.songs.len(),
            dataset.memberships.len(),
            dataset.interactions.len()
        );
        Ok(dataset)
    }

    /// Loads from SQLite for `.db`, `.db3` and `.sqlite` files, JSON otherwise.
    ///
    /// # Errors
    ///
    /// Propagates loader failures.
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("db" | "db3" | "sqlite" | "sqlite3") => crate::db::load(path),
            _ => Self::from_json_file(path),
        }
    }
}
