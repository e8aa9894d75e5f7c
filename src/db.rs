//! Read-only SQLite loader for the catalog service's tables.
//!
//! Expected schema (extra columns and tables are ignored):
//!
//! ```sql
//! songs (id INTEGER, title TEXT, artist TEXT, genre TEXT, release_year INTEGER,
//!        tempo REAL, energy REAL, duration INTEGER)
//! playlists (id INTEGER, name TEXT, user_id INTEGER)
//! playlist_songs (playlist_id INTEGER, song_id INTEGER)
//! user_song_interactions (user_id INTEGER, song_id INTEGER, played INTEGER,
//!        completed INTEGER, skipped INTEGER, skip_position_ms INTEGER,
//!        listen_duration_ms INTEGER, song_duration_ms INTEGER, timestamp INTEGER)
//! ```
//!
//! Playlist membership is resolved to `(owner, song)` edges through
//! `playlists.user_id`. The database is opened read-only; nothing here writes.

use crate::dataset::Dataset;
use crate::song::{InteractionEvent, MembershipEdge, Song, SongRecord};
use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, Row};
use std::path::Path;

/// Opens `path` read-only.
///
/// # Errors
///
/// Fails if the file is missing or isn't an SQLite database.
pub fn connect(path: &Path) -> Result<Connection> {
    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX)
        .with_context(|| format!("Rusqlite DB connection refused. DB location: `{}'", path.display()))
}

/// Loads the whole dataset from the database at `path`.
///
/// # Errors
///
/// Fails on connection or query errors, and on songs that don't validate.
pub fn load(path: &Path) -> Result<Dataset> {
    let conn = connect(path)?;
    let dataset = Dataset {
        songs: songs(&conn)?,
        memberships: memberships(&conn)?,
        interactions: interactions(&conn)?,
    };

    log::info!(
        "Loaded {} songs, {} memberships, {} interactions from `{}'",
        dataset.songs.len(),
        dataset.memberships.len(),
        dataset.interactions.len(),
        path.display()
    );
    Ok(dataset)
}

/// All songs, ascending id.
///
/// # Errors
///
/// Fails on query errors or the first invalid song record.
pub fn songs(conn: &Connection) -> Result<Vec<Song>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, title, artist, genre, release_year, tempo, energy, duration
             FROM songs ORDER BY id",
        )
        .context("Invalid SQL statement when SELECTing songs.")?;

    // NULL text columns come through as `None` and fail validation, not decoding.
    let rows = stmt.query_map([], |row| {
        Ok(SongRecord {
            id: row.get(0)?,
            title: row.get(1)?,
            artist: row.get(2)?,
            genre: row.get(3)?,
            release_year: row.get(4)?,
            tempo: row.get(5)?,
            energy: row.get(6)?,
            duration: row.get(7)?,
        })
    })?;

    let mut songs = Vec::new();
    for row in rows {
        let record = row.context("Failed to read song row.")?;
        let id = record.id;
        let song = Song::try_from(record).with_context(|| format!("Song row `{id}' failed validation."))?;
        songs.push(song);
    }
    Ok(songs)
}

/// Distinct `(playlist owner, song)` pairs.
///
/// # Errors
///
/// Fails on query errors.
pub fn memberships(conn: &Connection) -> Result<Vec<MembershipEdge>> {
    let mut stmt = conn
        .prepare(
            "SELECT DISTINCT p.user_id, ps.song_id
             FROM playlist_songs ps JOIN playlists p ON p.id = ps.playlist_id
             ORDER BY p.user_id, ps.song_id",
        )
        .context("Invalid SQL statement when SELECTing playlist memberships.")?;

    let edges = stmt
        .query_map([], |row| {
            Ok(MembershipEdge {
                user_id: row.get(0)?,
                song_id: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to read playlist membership rows.")?;
    Ok(edges)
}

/// Every interaction event, in insertion order.
///
/// # Errors
///
/// Fails on query errors.
pub fn interactions(conn: &Connection) -> Result<Vec<InteractionEvent>> {
    let mut stmt = conn
        .prepare(
            "SELECT user_id, song_id, played, completed, skipped, skip_position_ms,
                    listen_duration_ms, song_duration_ms, timestamp
             FROM user_song_interactions ORDER BY rowid",
        )
        .context("Invalid SQL statement when SELECTing interactions.")?;

    let events = stmt
        .query_map([], interaction_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to read interaction rows.")?;
    Ok(events)
}

fn interaction_from_row(row: &Row<'_>) -> rusqlite::Result<InteractionEvent> {
    Ok(InteractionEvent {
        user_id: row.get(0)?,
        song_id: row.get(1)?,
        played: row.get(2)?,
        completed: row.get(3)?,
        skipped: row.get(4)?,
        skip_position_ms: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
        listen_duration_ms: row.get::<_, Option<i64>>(6)?.unwrap_or(0),
        song_duration_ms: row.get::<_, Option<i64>>(7)?.unwrap_or(0),
        timestamp: row.get::<_, Option<i64>>(8)?.unwrap_or(0),
    })
}
