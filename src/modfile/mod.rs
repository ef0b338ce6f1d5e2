//! The canonical dependency declaration produced by manifest conversion.
//!
//! Writing the file to disk is left to the caller; this module only models the
//! content and renders it:
//!
//! ```text
//! module example.com/app
//!
//! require (
//! 	github.com/a/b v1.0.0
//! )
//!
//! replace github.com/a/b => github.com/fork/b v1.0.1
//! ```

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::core::ModinvError;
use crate::module::{self, ModuleVersion, ReplaceDirective};

/// A required module and its minimum version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Require {
    /// Module path
    pub path: String,
    /// Required version or revision
    pub version: String,
}

/// Canonical dependency file content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalFile {
    /// Path of the module this file declares
    pub module: String,
    /// Requirements in first-seen order
    pub requires: Vec<Require>,
    /// Replace directives in first-seen order
    pub replaces: Vec<ReplaceDirective>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl CanonicalFile {
    /// Creates an empty file for `module`.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            ..Self::default()
        }
    }

    /// Adds a requirement. A path already required keeps its first version.
    ///
    /// Returns whether the requirement was added.
    ///
    /// # Errors
    ///
    /// Fails if `path` is empty or contains a backslash, or `version` is empty.
    pub fn add_require(
        &mut self,
        path: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<bool, ModinvError> {
        let path = path.into();
        let version = version.into();
        module::check_path(&path, "requirement")?;
        if version.is_empty() {
            return Err(ModinvError::Other {
                message: format!("requirement {path} has no version"),
            });
        }

        if !self.seen.insert(path.clone()) {
            return Ok(false);
        }
        self.requires.push(Require {
            path,
            version,
        });
        Ok(true)
    }

    /// Adds a replace directive for every version of `old`.
    ///
    /// # Errors
    ///
    /// Fails if either path is invalid.
    pub fn add_replace(
        &mut self,
        old: impl Into<String>,
        new: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<(), ModinvError> {
        let old = old.into();
        let new = new.into();
        module::check_path(&old, "replace directive")?;
        module::check_path(&new, "replace directive")?;

        if self.replaces.iter().any(|r| r.old.path == old) {
            return Ok(());
        }
        self.replaces.push(ReplaceDirective {
            old: ModuleVersion::new(old, ""),
            new: ModuleVersion::new(new, version),
        });
        Ok(())
    }

    /// Whether no requirement and no replacement was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requires.is_empty() && self.replaces.is_empty()
    }
}

impl fmt::Display for CanonicalFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "module {}", self.module)?;

        if !self.requires.is_empty() {
            writeln!(f)?;
            writeln!(f, "require (")?;
            for require in &self.requires {
                writeln!(f, "\t{} {}", require.path, require.version)?;
            }
            writeln!(f, ")")?;
        }

        if !self.replaces.is_empty() {
            writeln!(f)?;
            for replace in &self.replaces {
                writeln!(f, "replace {} => {}", replace.old, render_target(&replace.new))?;
            }
        }
        Ok(())
    }
}

fn render_target(target: &ModuleVersion) -> String {
    if target.version.is_empty() {
        target.path.clone()
    } else {
        format!("{} {}", target.path, target.version)
    }
}
