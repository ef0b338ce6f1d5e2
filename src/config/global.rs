//! Global configuration for modinv.
//!
//! The global configuration file holds user-wide defaults for listing. It is
//! optional: a missing file means every default applies.
//!
//! # Configuration File Location
//!
//! - **Unix/macOS**: `~/.modinv/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\modinv\config.toml`
//!
//! The `MODINV_CONFIG` environment variable overrides the location, and the
//! `--config` flag overrides both.
//!
//! # File Format
//!
//! ```toml
//! # Version index consulted when `list` is run without --index
//! index = "/srv/modinv/versions.toml"
//!
//! # Ceiling for concurrent version queries during enrichment
//! max_parallel = 16
//!
//! # Snapshot file name looked up in the working directory
//! lockfile = "modinv.lock"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::constants::{CONFIG_PATH_ENV, DEFAULT_ENRICH_PARALLELISM, DEFAULT_LOCKFILE_NAME};
use crate::core::ModinvError;

const fn default_max_parallel() -> usize {
    DEFAULT_ENRICH_PARALLELISM
}

fn default_lockfile() -> String {
    DEFAULT_LOCKFILE_NAME.to_string()
}

/// User-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default version index file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<PathBuf>,

    /// Maximum number of modules enriched concurrently.
    ///
    /// Default: 10. A value of 0 behaves like 1.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,

    /// Snapshot file name used when `--lockfile` is not given.
    #[serde(default = "default_lockfile")]
    pub lockfile: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            index: None,
            max_parallel: default_max_parallel(),
            lockfile: default_lockfile(),
        }
    }
}

impl GlobalConfig {
    /// Loads the configuration from `path`, or from the default location when
    /// `path` is `None`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        if fs::try_exists(&path).await.unwrap_or(false) {
            Self::load_from(&path).await
        } else {
            debug!("No global config at '{}', using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Loads the configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, and a
    /// [`ModinvError::ConfigError`] if it is not valid configuration TOML.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read global config from {}", path.display()))?;

        let config: Self = toml::from_str(&content).map_err(|e| ModinvError::ConfigError {
            message: format!("{}: {}", path.display(), e.message()),
        })?;
        debug!("Loaded global config from '{}'", path.display());
        Ok(config)
    }

    /// The configuration path: `MODINV_CONFIG` if set, else the platform default.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("modinv")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".modinv")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// The enrichment ceiling with 0 clamped to 1.
    #[must_use]
    pub fn effective_parallelism(&self) -> usize {
        self.max_parallel.max(1)
    }
}
