//! Configuration file discovery.
//!
//! Resolution order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `hoist-lint.toml` or `.hoist-lint.toml` in the analyzed directory or
//!    the nearest ancestor, stopping at the repository root (a directory
//!    containing `.git`)
//! 3. `$HOIST_LINT_CONFIG_DIR/config.toml`, else `~/.hoist-lint/config.toml`
//! 4. No config found → defaults

use anyhow::{Context, Result};
use hoist_lint_core::Config;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found next to the analyzed sources or in an enclosing directory.
    Project(PathBuf),
    /// Loaded from the global config directory.
    Global(PathBuf),
    /// No config found; defaults will be used.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads and parses the configuration this source points at.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            tracing::debug!("No config file found, using defaults");
            return Ok(Config::default());
        };

        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global config: {}", path.display());
        }

        Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

/// Config file names, checked in order within each directory.
const PROJECT_CONFIG_NAMES: &[&str] = &["hoist-lint.toml", ".hoist-lint.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file for sources under `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    let start = project_dir
        .canonicalize()
        .unwrap_or_else(|_| project_dir.to_path_buf());
    resolve_inner(&start, explicit, global_config_dir())
}

/// Takes `global_dir` as a parameter so tests need not touch the environment.
fn resolve_inner(project_dir: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = find_in_ancestors(project_dir) {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    if let Some(dir) = global_dir {
        let candidate = dir.join(GLOBAL_CONFIG_NAME);
        if candidate.is_file() {
            tracing::debug!("Found global config: {}", candidate.display());
            return ConfigSource::Global(candidate);
        }
    }

    ConfigSource::Default
}

/// Nearest config file in `dir` or its ancestors, up to the repository root.
fn find_in_ancestors(dir: &Path) -> Option<PathBuf> {
    for current in dir.ancestors() {
        let found = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| current.join(name))
            .find(|candidate| candidate.is_file());
        if found.is_some() {
            return found;
        }

        if current.join(".git").exists() {
            break;
        }
    }
    None
}

/// Returns the global config directory path.
///
/// `$HOIST_LINT_CONFIG_DIR` takes precedence over `~/.hoist-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("HOIST_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".hoist-lint"))
}
