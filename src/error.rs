//! Error types for the recommendation core.
//!
//! Algorithms return [`CoreError`]; the loaders and the binary wrap these in
//! `anyhow::Error` with extra context.

use crate::song::SongId;
use thiserror::Error;

/// Errors surfaced by the recommendation and search algorithms
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A song id was referenced that the catalog does not contain
    #[error("song {song_id} not found in catalog")]
    NotFound { song_id: SongId },

    /// A catalog record failed validation
    #[error("song {song_id} failed validation: {reason}")]
    DataIntegrity { song_id: SongId, reason: String },
}

impl CoreError {
    pub fn data_integrity(song_id: SongId, reason: impl Into<String>) -> Self {
        Self::DataIntegrity {
            song_id,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_song() {
        let err = CoreError::NotFound { song_id: 42 };
        assert_eq!(err.to_string(), "song 42 not found in catalog");

        let err = CoreError::data_integrity(7, "title is blank");
        assert_eq!(err.to_string(), "song 7 failed validation: title is blank");
    }
}
