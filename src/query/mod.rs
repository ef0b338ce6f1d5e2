//! Version queries.
//!
//! [`QueryService`] is the seam to whatever knows which versions of a module
//! exist. Listing uses it to resolve `path@query` selectors, to look up
//! unmatched literals, and to enrich descriptors. The crate ships
//! [`IndexQueryService`], which answers from a local TOML index:
//!
//! ```toml
//! [modules]
//! "github.com/a/b" = ["v1.0.0", "v1.1.0", "v1.2.0"]
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;
use tracing::{debug, trace};

use crate::core::ModinvError;
use crate::version::{self, VersionQuery};

/// Result of a successful version query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryInfo {
    /// The resolved version
    pub version: String,
}

/// Resolves version queries for module paths.
///
/// Implementations may perform I/O; callers await each call and never hold
/// locks across it.
pub trait QueryService {
    /// Resolves `constraint` (`latest`, `v1.2.3`, `<v2`, ...) for `path`.
    ///
    /// # Errors
    ///
    /// [`ModinvError::ModuleNotFound`] if the module is unknown,
    /// [`ModinvError::NoMatchingVersion`] if nothing satisfies the query and
    /// [`ModinvError::InvalidVersionConstraint`] for a malformed constraint.
    fn query(
        &self,
        path: &str,
        constraint: &str,
    ) -> impl Future<Output = Result<QueryInfo, ModinvError>>;

    /// Lists the known versions of `path` in ascending order.
    ///
    /// # Errors
    ///
    /// [`ModinvError::ModuleNotFound`] if the module is unknown.
    fn versions(&self, path: &str) -> impl Future<Output = Result<Vec<String>, ModinvError>>;
}

#[derive(Debug, Default, Deserialize)]
struct IndexFile {
    #[serde(default)]
    modules: BTreeMap<String, Vec<String>>,
}

/// Query service backed by an in-memory version index.
#[derive(Debug, Clone, Default)]
pub struct IndexQueryService {
    modules: BTreeMap<String, Vec<String>>,
}

impl IndexQueryService {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the versions known for `path`.
    #[must_use]
    pub fn with_module<I, S>(mut self, path: impl Into<String>, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut versions: Vec<String> = versions.into_iter().map(Into::into).collect();
        version::sort_versions(&mut versions);
        self.modules.insert(path.into(), versions);
        self
    }

    /// Parses index text.
    ///
    /// # Errors
    ///
    /// Returns [`ModinvError::ConfigError`] if the text is not a valid index.
    pub fn parse(content: &str) -> Result<Self, ModinvError> {
        let file: IndexFile = toml::from_str(content).map_err(|e| ModinvError::ConfigError {
            message: format!("invalid version index: {e}"),
        })?;

        Ok(file
            .modules
            .into_iter()
            .fold(Self::new(), |index, (path, versions)| index.with_module(path, versions)))
    }

    /// Loads an index file. A missing file yields an empty index.
    ///
    /// # Errors
    ///
    /// Returns [`ModinvError::IoError`] if the file exists but cannot be read
    /// and [`ModinvError::ConfigError`] if it cannot be parsed.
    pub async fn load(path: &Path) -> Result<Self, ModinvError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Version index '{}' not found, using an empty index", path.display());
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(ModinvError::IoError {
                    operation: "read version index".to_string(),
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let index = Self::parse(&content)?;
        debug!("Loaded version index '{}' with {} modules", path.display(), index.len());
        Ok(index)
    }

    /// Number of indexed modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn known(&self, path: &str) -> Result<&[String], ModinvError> {
        self.modules.get(path).map(Vec::as_slice).ok_or_else(|| ModinvError::ModuleNotFound {
            path: path.to_string(),
        })
    }
}

impl QueryService for IndexQueryService {
    async fn query(&self, path: &str, constraint: &str) -> Result<QueryInfo, ModinvError> {
        trace!("Querying '{}' for '{}'", path, constraint);
        let query = VersionQuery::parse(constraint)?;
        let known = self.known(path)?;

        query
            .select(known)
            .map(|version| QueryInfo {
                version: version.clone(),
            })
            .ok_or_else(|| ModinvError::NoMatchingVersion {
                path: path.to_string(),
                query: constraint.to_string(),
            })
    }

    async fn versions(&self, path: &str) -> Result<Vec<String>, ModinvError> {
        self.known(path).map(<[String]>::to_vec)
    }
}
