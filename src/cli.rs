//! # Command-Line Interface Module
//!
//! Clap definitions for the `cadence` binary. Every command loads the
//! dataset, runs one engine operation and prints the resulting songs.
//!
//! ## Examples
//!
//! ```bash
//! cadence --data catalog.json similar 12
//! cadence --data music.db cf 3 --limit 20
//! cadence genre jazz -k 4
//! cadence fuzzy "bohemain rapsody" --max-distance 3
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(about = "Cadence: music recommendations and search over a song catalog")]
#[command(version)]
pub struct Args {
    /// Dataset to load: `.json`, or an SQLite `.db`/`.sqlite` file
    ///
    /// Defaults to `catalog.json` in the platform data directory.
    #[arg(long, global = true, env = "CADENCE_DATA", value_hint = clap::ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    /// JSON config file with seed and algorithm settings
    #[arg(long, global = true, env = "CADENCE_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Seed for every random choice (overrides the config file)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List every song in the catalog
    List,

    /// Songs with the closest genre, energy, tempo and release year
    Similar {
        /// Id of the seed song
        song_id: i64,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Collaborative filtering: songs liked by users with similar taste
    ///
    /// Users without history get random songs they don't know yet.
    Cf {
        user_id: i64,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Matrix factorization: songs with the highest predicted rating
    ///
    /// Trains a latent-factor model on every call; tune it in the config file.
    Mf {
        user_id: i64,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Representative songs of a genre, picked by clustering
    Genre {
        genre: String,

        /// Number of representatives
        #[arg(short, default_value_t = 5)]
        k: usize,
    },

    /// Songs whose title or artist starts with a prefix
    Autocomplete {
        #[arg(value_hint = clap::ValueHint::Other)]
        prefix: String,
    },

    /// Typo-tolerant title/artist search
    Fuzzy {
        query: String,

        /// Maximum edit distance
        #[arg(short, long, default_value_t = 2)]
        max_distance: usize,
    },

    /// Songs whose title, artist or genre contains the query
    Search { query: String },

    /// Songs ranked by popularity
    Popular {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Random songs from the catalog
    Random {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Generate shell completions
    ///
    /// Usage: cadence completion bash > ~/.local/share/bash-completion/completions/cadence
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },

    /// Titles and artists starting with a prefix, one per line (hidden command)
    #[command(hide = true)]
    CompleteSongs {
        #[arg(default_value = "")]
        prefix: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = Args::try_parse_from(["cadence", "cf", "3", "--limit", "4", "--seed", "9", "--data", "x.db"])
            .expect("parses");
        assert_eq!(args.command, Command::Cf { user_id: 3, limit: 4 });
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.data, Some(PathBuf::from("x.db")));
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["cadence", "fuzzy", "tst"]).expect("parses");
        assert_eq!(
            args.command,
            Command::Fuzzy {
                query: "tst".to_string(),
                max_distance: 2
            }
        );

        let args = Args::try_parse_from(["cadence", "genre", "jazz", "-k", "3"]).expect("parses");
        assert_eq!(
            args.command,
            Command::Genre {
                genre: "jazz".to_string(),
                k: 3
            }
        );
    }

    #[test]
    fn test_rejects_bad_ids() {
        assert!(Args::try_parse_from(["cadence", "similar", "abc"]).is_err());
        assert!(Args::try_parse_from(["cadence"]).is_err());
    }
}
