//! The build list: the selected version of every module in the build.
//!
//! The build list is produced by version selection, which happens elsewhere.
//! This module only holds the result and loads it lazily:
//!
//! - [`BuildList`] - immutable ordered list, index 0 is the root module
//! - [`BuildListLoader`] - anything that can produce a build list
//! - [`BuildListAccessor`] - idempotent, load-at-most-once wrapper around a loader
//! - [`snapshot::LockfileLoader`] - loader for `modinv.lock` snapshots
//!
//! # Root Visibility
//!
//! Index 0 is always the root module, but the root may be synthetic (no module
//! file on disk). [`BuildList::root_exists`] tells matchers whether index 0 is
//! visible to selectors.

pub mod snapshot;

use std::collections::{HashMap, HashSet};
use std::future::Future;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::core::ModinvError;
use crate::module::{self, ModuleVersion, ReplaceDirective};

pub use snapshot::LockfileLoader;

/// A module in the build list together with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildListEntry<'a> {
    /// Position in the build list; 0 is the root module
    pub index: usize,
    /// The selected module version
    pub module: &'a ModuleVersion,
}

impl BuildListEntry<'_> {
    /// Whether this entry is the root module.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.index == 0
    }
}

/// Ordered, deduplicated result of version selection.
#[derive(Debug, Clone)]
pub struct BuildList {
    modules: Vec<ModuleVersion>,
    replaces: Vec<ReplaceDirective>,
    indirect: HashSet<String>,
    root_exists: bool,
}

impl BuildList {
    /// Creates a build list from the root module and its selected dependencies.
    ///
    /// The root module is assumed to exist on disk; see [`Self::with_root_exists`].
    ///
    /// # Errors
    ///
    /// Returns [`ModinvError::BuildListInvalid`] if a path is empty, contains a
    /// backslash, or appears more than once.
    pub fn new(root: ModuleVersion, dependencies: Vec<ModuleVersion>) -> Result<Self, ModinvError> {
        let mut modules = Vec::with_capacity(dependencies.len() + 1);
        modules.push(root);
        modules.extend(dependencies);

        let invalid = |reason: String| ModinvError::BuildListInvalid {
            origin: "build list".to_string(),
            reason,
        };

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (index, m) in modules.iter().enumerate() {
            module::check_path(&m.path, "build list").map_err(|e| invalid(e.to_string()))?;
            if let Some(first) = seen.insert(m.path.as_str(), index) {
                return Err(invalid(format!(
                    "module '{}' appears at positions {first} and {index}",
                    m.path
                )));
            }
        }

        debug!("Build list has {} modules (including root)", modules.len());

        Ok(Self {
            modules,
            replaces: Vec::new(),
            indirect: HashSet::new(),
            root_exists: true,
        })
    }

    /// Sets the replace directives consulted when building descriptors.
    #[must_use]
    pub fn with_replaces(mut self, replaces: Vec<ReplaceDirective>) -> Self {
        self.replaces = replaces;
        self
    }

    /// Records whether the root module exists on disk.
    #[must_use]
    pub const fn with_root_exists(mut self, root_exists: bool) -> Self {
        self.root_exists = root_exists;
        self
    }

    /// Marks module paths as indirect dependencies.
    #[must_use]
    pub fn with_indirect<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indirect.extend(paths.into_iter().map(Into::into));
        self
    }

    /// The root module (index 0).
    #[must_use]
    pub fn root(&self) -> &ModuleVersion {
        &self.modules[0]
    }

    /// Whether the root module exists on disk and is visible to selectors.
    #[must_use]
    pub const fn root_exists(&self) -> bool {
        self.root_exists
    }

    /// All modules in build list order, root first.
    #[must_use]
    pub fn modules(&self) -> &[ModuleVersion] {
        &self.modules
    }

    /// Number of modules, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Always false: a build list contains at least the root module.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterates over entries in index order.
    pub fn entries(&self) -> impl Iterator<Item = BuildListEntry<'_>> {
        self.modules.iter().enumerate().map(|(index, module)| BuildListEntry {
            index,
            module,
        })
    }

    /// The directive redirecting `module`, if any.
    #[must_use]
    pub fn replacement(&self, module: &ModuleVersion) -> Option<&ReplaceDirective> {
        module::find_replacement(&self.replaces, module)
    }

    /// Whether `path` was recorded as an indirect dependency.
    #[must_use]
    pub fn is_indirect(&self, path: &str) -> bool {
        self.indirect.contains(path)
    }
}

/// A source of build lists.
///
/// Implementations perform whatever I/O is needed to produce the selected
/// build list. [`BuildListAccessor`] guarantees `load` is called at most once
/// per accessor.
pub trait BuildListLoader {
    /// Produces the build list.
    fn load(&self) -> impl Future<Output = Result<BuildList, ModinvError>>;
}

impl BuildListLoader for BuildList {
    async fn load(&self) -> Result<BuildList, ModinvError> {
        Ok(self.clone())
    }
}

/// Lazily loads a build list exactly once and hands out shared references.
///
/// Calling [`ensure_loaded`](Self::ensure_loaded) repeatedly is cheap and
/// always returns the same build list. A failed load is not cached; the next
/// call retries.
pub struct BuildListAccessor<L> {
    loader: L,
    loaded: OnceCell<BuildList>,
}

impl<L: BuildListLoader> BuildListAccessor<L> {
    /// Wraps a loader. Nothing is loaded until first use.
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            loaded: OnceCell::new(),
        }
    }

    /// Loads the build list if it has not been loaded yet.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error.
    pub async fn ensure_loaded(&self) -> Result<&BuildList, ModinvError> {
        self.loaded
            .get_or_try_init(|| async {
                debug!("Loading build list");
                self.loader.load().await
            })
            .await
    }

    /// The build list, if already loaded.
    pub fn get(&self) -> Option<&BuildList> {
        self.loaded.get()
    }

    /// The wrapped loader.
    pub const fn loader(&self) -> &L {
        &self.loader
    }
}
