//! # Configuration Module
//!
//! Runtime settings and the default data location.
//!
//! ## Data Storage
//!
//! Without `--data`, Cadence reads `catalog.json` from the platform data
//! directory:
//! - Linux: `~/.local/share/cadence/`
//! - macOS: `~/Library/Application Support/cadence/`
//! - Windows: `%APPDATA%\cadence\`
//!
//! ## Config File
//!
//! An optional JSON file overrides any subset of the defaults:
//!
//! ```json
//! {
//!   "data_path": "catalog.db",
//!   "seed": 7,
//!   "factorization": { "num_factors": 16, "iterations": 50 },
//!   "cluster": { "max_rounds": 20 }
//! }
//! ```
//!
//! A relative `data_path` is resolved against the config file's directory.

use crate::cluster::ClusterConfig;
use crate::factorization::FactorizationConfig;
use anyhow::{Context, Result};
use path_absolutize::Absolutize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Seed used when neither the config file nor the command line sets one.
pub const DEFAULT_SEED: u64 = 42;

/// Returns the platform-appropriate data directory for Cadence, creating it
/// if needed.
///
/// # Errors
///
/// This function will return an error if:
/// - The system data directory cannot be determined
/// - The cadence subdirectory cannot be created due to permissions
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        )
    })?;

    let cadence_dir = data_dir.join("cadence");
    fs::create_dir_all(&cadence_dir).with_context(|| {
        format!(
            "Failed to create Cadence data directory at {}. Please check file permissions.",
            cadence_dir.display()
        )
    })?;

    Ok(cadence_dir)
}

/// Default dataset location: `catalog.json` in [`get_data_dir`].
///
/// # Errors
///
/// See [`get_data_dir`].
pub fn default_data_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("catalog.json"))
}

/// Turns `path` into an absolute path, relative paths being taken from `base`.
///
/// # Errors
///
/// Fails if the path can't be absolutized.
pub fn resolve_path(path: &Path, base: &Path) -> Result<PathBuf> {
    let absolute = path
        .absolutize_from(base)
        .with_context(|| format!("Failed to resolve path `{}'", path.display()))?;
    Ok(absolute.into_owned())
}

/// Configuration for runtime behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Dataset file; `None` means [`default_data_path`].
    pub data_path: Option<PathBuf>,
    /// Seeds the engine's random number generator.
    pub seed: u64,
    pub factorization: FactorizationConfig,
    pub cluster: ClusterConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            seed: DEFAULT_SEED,
            factorization: FactorizationConfig::default(),
            cluster: ClusterConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Reads a JSON config file. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file can't be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("Failed to read config `{}'", path.display()))?;
        let mut config: Self =
            serde_json::from_str(&raw).with_context(|| format!("Invalid config JSON in `{}'", path.display()))?;

        if let Some(data_path) = &config.data_path {
            let config_path = path
                .absolutize()
                .with_context(|| format!("Failed to resolve path `{}'", path.display()))?;
            let base = config_path.parent().unwrap_or_else(|| Path::new("/"));
            config.data_path = Some(resolve_path(data_path, base)?);
        }

        log::debug!("Loaded config from `{}': {config:?}", path.display());
        Ok(config)
    }

    /// Create configuration with explicit data path.
    #[must_use]
    pub fn with_data_path(mut self, data_path: PathBuf) -> Self {
        self.data_path = Some(data_path);
        self
    }

    /// The configured data path, or [`default_data_path`].
    ///
    /// # Errors
    ///
    /// See [`default_data_path`].
    pub fn data_path(&self) -> Result<PathBuf> {
        match &self.data_path {
            Some(path) => Ok(path.clone()),
            None => default_data_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.factorization.num_factors, 10);
        assert_eq!(config.cluster.max_rounds, 100);
        assert!(config.data_path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("cadence.json");
        let mut file = fs::File::create(&path).expect("create");
        write!(file, r#"{{"seed": 7, "factorization": {{"iterations": 5}}, "data_path": "songs.db"}}"#).expect("write");

        let config = RuntimeConfig::load(&path).expect("loads");
        assert_eq!(config.seed, 7);
        assert_eq!(config.factorization.iterations, 5);
        assert_eq!(config.factorization.num_factors, 10);
        assert_eq!(config.cluster, ClusterConfig::default());
        assert_eq!(config.data_path, Some(dir.path().join("songs.db")));
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ seed: ").expect("write");
        assert!(RuntimeConfig::load(&path).is_err());
        assert!(RuntimeConfig::load(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/srv/cadence");
        assert_eq!(resolve_path(Path::new("a/../b.json"), base).expect("resolves"), PathBuf::from("/srv/cadence/b.json"));
        assert_eq!(resolve_path(Path::new("/abs.db"), base).expect("resolves"), PathBuf::from("/abs.db"));
    }

    #[test]
    fn test_data_dir_structure() {
        let dir = get_data_dir().expect("Should get valid path");
        assert!(dir.is_absolute());
        assert!(dir.ends_with("cadence"));
        assert!(default_data_path().expect("path").ends_with("cadence/catalog.json"));
    }
}
