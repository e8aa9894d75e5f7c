//! # Shell Completion Module
//!
//! Static completion scripts come from `clap_complete`; the hidden
//! `complete-songs` command feeds song titles and artists from the search
//! index for dynamic completion.
//!
//! ```bash
//! cadence completion bash > ~/.local/share/bash-completion/completions/cadence
//! cadence completion zsh > ~/.config/zsh/completions/_cadence
//! ```

use crate::cli::Shell;
use crate::engine::RecommendationEngine;
use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};
use std::collections::BTreeSet;
use std::io;

/// Generate shell completions for the given shell
pub fn generate_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// Convert our Shell enum to clap_complete's Shell enum
#[must_use]
pub fn shell_to_completion_shell(shell: Shell) -> CompletionShell {
    match shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    }
}

/// Titles and artists of songs matching `prefix`, deduplicated and sorted.
#[must_use]
pub fn song_completions(engine: &RecommendationEngine, prefix: &str) -> Vec<String> {
    let prefix = prefix.to_lowercase();
    let mut completions = BTreeSet::new();
    for song in engine.songs(&engine.autocomplete(&prefix)) {
        for name in [song.title(), song.artist()] {
            if name.to_lowercase().starts_with(&prefix) {
                completions.insert(name.to_string());
            }
        }
    }
    completions.into_iter().collect()
}

/// Quotes completions containing whitespace for shells other than fish.
#[must_use]
pub fn quote_for_shell(completion: &str) -> String {
    match completion.contains(char::is_whitespace) {
        true => format!("\"{}\"", completion.replace('"', "\\\"")),
        false => completion.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;
    use crate::dataset::Dataset;
    use crate::song::Song;

    #[test]
    fn test_shell_conversion() {
        assert_eq!(shell_to_completion_shell(Shell::Bash), CompletionShell::Bash);
        assert_eq!(shell_to_completion_shell(Shell::Zsh), CompletionShell::Zsh);
        assert_eq!(shell_to_completion_shell(Shell::PowerShell), CompletionShell::PowerShell);
    }

    #[test]
    fn test_song_completions() {
        let dataset = Dataset {
            songs: vec![
                Song::new(1, "Test Drive", "Tess", "pop", 2000, 120.0, 0.5, 180).expect("valid song"),
                Song::new(2, "Other", "Test Drive", "pop", 2000, 120.0, 0.5, 180).expect("valid song"),
            ],
            ..Dataset::default()
        };
        let engine = RecommendationEngine::new(dataset, &RuntimeConfig::default()).expect("valid");

        assert_eq!(song_completions(&engine, "TE"), vec!["Tess", "Test Drive"]);
        assert!(song_completions(&engine, "zz").is_empty());
    }

    #[test]
    fn test_quote_for_shell() {
        assert_eq!(quote_for_shell("Plain"), "Plain");
        assert_eq!(quote_for_shell("Two Words"), "\"Two Words\"");
        assert_eq!(quote_for_shell("Say \"hi\""), "\"Say \\\"hi\\\"\"");
    }
}
