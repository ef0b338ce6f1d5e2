//! Build list snapshots (`modinv.lock`).
//!
//! A snapshot records the outcome of version selection so that listing never
//! has to select versions itself:
//!
//! ```toml
//! [root]
//! path = "example.com/app"
//! exists = true                 # optional, default true
//!
//! [[module]]
//! path = "github.com/a/b"
//! version = "v1.2.0"
//! indirect = true               # optional
//!
//! [[replace]]
//! old = { path = "github.com/a/b" }
//! new = { path = "github.com/fork/b", version = "v1.2.1" }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{BuildList, BuildListLoader};
use crate::core::ModinvError;
use crate::module::{self, ModuleVersion, ReplaceDirective};

/// On-disk representation of a build list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// The root module
    pub root: SnapshotRoot,
    /// Selected dependencies in build list order
    #[serde(default, rename = "module", skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<SnapshotModule>,
    /// Replace directives of the root module
    #[serde(default, rename = "replace", skip_serializing_if = "Vec::is_empty")]
    pub replaces: Vec<ReplaceDirective>,
}

/// Root module entry of a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRoot {
    /// Root module path
    pub path: String,
    /// Root module version, usually empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Whether the root module has a module file on disk
    #[serde(default = "default_exists")]
    pub exists: bool,
}

/// Dependency entry of a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotModule {
    /// Module path
    pub path: String,
    /// Selected version
    pub version: String,
    /// Whether the dependency is only needed transitively
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub indirect: bool,
}

const fn default_exists() -> bool {
    true
}

impl Snapshot {
    /// Parses snapshot text. `origin` names the source in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ModinvError::BuildListInvalid`] for TOML errors and for
    /// snapshots that violate build list invariants.
    pub fn parse(content: &str, origin: &str) -> Result<Self, ModinvError> {
        toml::from_str(content).map_err(|e| ModinvError::BuildListInvalid {
            origin: origin.to_string(),
            reason: e.to_string(),
        })
    }

    /// Converts the snapshot into a validated [`BuildList`].
    ///
    /// # Errors
    ///
    /// Returns [`ModinvError::BuildListInvalid`] if module paths are invalid or
    /// duplicated, or a replace directive names an invalid module path.
    pub fn into_build_list(self, origin: &str) -> Result<BuildList, ModinvError> {
        let relabel = |e: ModinvError| match e {
            ModinvError::BuildListInvalid {
                reason, ..
            } => ModinvError::BuildListInvalid {
                origin: origin.to_string(),
                reason,
            },
            other => ModinvError::BuildListInvalid {
                origin: origin.to_string(),
                reason: other.to_string(),
            },
        };

        for replace in &self.replaces {
            module::check_path(&replace.old.path, "replace directive").map_err(relabel)?;
            if !replace.is_local() {
                module::check_path(&replace.new.path, "replace directive").map_err(relabel)?;
            }
        }

        let indirect: Vec<String> =
            self.modules.iter().filter(|m| m.indirect).map(|m| m.path.clone()).collect();
        let dependencies =
            self.modules.into_iter().map(|m| ModuleVersion::new(m.path, m.version)).collect();

        Ok(BuildList::new(ModuleVersion::new(self.root.path, self.root.version), dependencies)
            .map_err(relabel)?
            .with_root_exists(self.root.exists)
            .with_indirect(indirect)
            .with_replaces(self.replaces))
    }
}

/// Loads a build list from a snapshot file.
#[derive(Debug, Clone)]
pub struct LockfileLoader {
    path: PathBuf,
}

impl LockfileLoader {
    /// Creates a loader for the snapshot at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// The snapshot path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BuildListLoader for LockfileLoader {
    async fn load(&self) -> Result<BuildList, ModinvError> {
        let origin = self.path.display().to_string();
        debug!("Reading build list snapshot '{}'", origin);

        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ModinvError::BuildListNotFound {
                    path: origin,
                });
            }
            Err(e) => {
                return Err(ModinvError::IoError {
                    operation: "read build list snapshot".to_string(),
                    path: origin,
                    reason: e.to_string(),
                });
            }
        };

        Snapshot::parse(&content, &origin)?.into_build_list(&origin)
    }
}
