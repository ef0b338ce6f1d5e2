//! dep's `Gopkg.lock`.

use serde::Deserialize;

use super::{ManifestConverter, decode, repository_path, require_entry};
use crate::core::ModinvError;
use crate::modfile::CanonicalFile;

#[derive(Deserialize)]
struct Lock {
    #[serde(default)]
    projects: Vec<Project>,
}

#[derive(Deserialize)]
struct Project {
    #[serde(default)]
    name: String,
    #[serde(default)]
    revision: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    source: String,
}

/// dep's `Gopkg.lock`.
///
/// The revision is preferred over the version tag. A project fetched from a
/// different `source` is recorded as a replacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct GopkgLock;

impl GopkgLock {
    /// Registered file name.
    pub const FILE_NAME: &'static str = "Gopkg.lock";
}

impl ManifestConverter for GopkgLock {
    fn convert(&self, module_path: &str, data: &[u8]) -> Result<CanonicalFile, ModinvError> {
        let lock: Lock =
            toml::from_str(decode(Self::FILE_NAME, data)?).map_err(|e| ModinvError::ConversionFailed {
                file: Self::FILE_NAME.to_string(),
                reason: e.to_string(),
            })?;

        let mut out = CanonicalFile::new(module_path);
        for (index, project) in lock.projects.iter().enumerate() {
            let pinned =
                if project.revision.is_empty() { &project.version } else { &project.revision };
            require_entry(&mut out, Self::FILE_NAME, index + 1, &project.name, pinned)?;

            if !project.source.is_empty() {
                let target = repository_path(&project.source);
                if target != project.name {
                    out.add_replace(project.name.as_str(), target, pinned.as_str()).map_err(|e| {
                        ModinvError::ConversionFailed {
                            file: Self::FILE_NAME.to_string(),
                            reason: format!("entry {}: {e}", index + 1),
                        }
                    })?;
                }
            }
        }
        Ok(out)
    }
}
