//! Locating the layer configuration.
//!
//! `--config` is used as given. Without it the scan root is searched for a
//! project file, then the global directory (`$LAYER_LINT_CONFIG_DIR`, else
//! `~/.layer-lint/`). The first regular file found wins.

use std::path::{Path, PathBuf};

/// Project file names, in lookup order.
const PROJECT_FILES: [&str; 4] = ["layers.json", ".layers.json", "layers.toml", ".layers.toml"];

/// File looked up in the global directory.
const GLOBAL_FILE: &str = "layers.json";

/// How a configuration file was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// `--config` (or `LAYER_LINT_CONFIG`).
    Flag,
    /// A file in the scan root.
    Project,
    /// The global config directory.
    Global,
}

/// Result of the lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A configuration file to load.
    Found {
        /// File to load.
        path: PathBuf,
        /// How it was located.
        origin: Origin,
    },
    /// Nothing at any searched location.
    Missing {
        /// Every candidate looked at, in lookup order.
        searched: Vec<PathBuf>,
    },
}

/// Locates the configuration for a scan of `root`.
#[must_use]
pub fn resolve(root: &Path, flag: Option<&Path>) -> ConfigSource {
    if let Some(path) = flag {
        // Existence is checked on load so a bad flag is reported, not skipped.
        return ConfigSource::Found {
            path: path.to_path_buf(),
            origin: Origin::Flag,
        };
    }
    first_existing(candidates(root, global_dir().as_deref()))
}

/// Search list: project files in `root`, then the global file.
fn candidates(root: &Path, global: Option<&Path>) -> Vec<(PathBuf, Origin)> {
    PROJECT_FILES
        .iter()
        .map(|name| (root.join(name), Origin::Project))
        .chain(global.map(|dir| (dir.join(GLOBAL_FILE), Origin::Global)))
        .collect()
}

fn first_existing(candidates: Vec<(PathBuf, Origin)>) -> ConfigSource {
    match candidates.iter().position(|(path, _)| path.is_file()) {
        Some(i) => {
            let (path, origin) = candidates[i].clone();
            tracing::debug!("Config found at {} ({origin:?})", path.display());
            ConfigSource::Found { path, origin }
        }
        None => ConfigSource::Missing {
            searched: candidates.into_iter().map(|(path, _)| path).collect(),
        },
    }
}

fn global_dir() -> Option<PathBuf> {
    std::env::var_os("LAYER_LINT_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".layer-lint")))
}
