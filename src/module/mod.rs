//! Module identities and replace directives.
//!
//! A module is named by a slash-separated path (`github.com/owner/repo/v2`)
//! and pinned by a version string. The build list holds at most one
//! [`ModuleVersion`] per path.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::ModinvError;

/// A module path paired with a version.
///
/// The version may be empty for the root module and for local directory
/// replacements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleVersion {
    /// Slash-separated module path
    pub path: String,
    /// Semantic version, pseudo-version, or empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
}

impl ModuleVersion {
    /// Creates a module identity.
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}@{}", self.path, self.version)
        }
    }
}

/// Redirects a module (or one version of it) to another module or a local directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceDirective {
    /// The replaced module; an empty version applies to every version of the path
    pub old: ModuleVersion,
    /// The replacement; an empty version means `new.path` is a directory
    pub new: ModuleVersion,
}

impl ReplaceDirective {
    /// Whether this directive applies to `module`.
    #[must_use]
    pub fn applies_to(&self, module: &ModuleVersion) -> bool {
        self.old.path == module.path
            && (self.old.version.is_empty() || self.old.version == module.version)
    }

    /// Whether the replacement is a local directory rather than a module.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.new.version.is_empty()
    }
}

/// Finds the replacement for `module`.
///
/// A directive naming the exact version wins over a path-wide directive.
#[must_use]
pub fn find_replacement<'a>(
    replaces: &'a [ReplaceDirective],
    module: &ModuleVersion,
) -> Option<&'a ReplaceDirective> {
    replaces
        .iter()
        .find(|r| !r.old.version.is_empty() && r.applies_to(module))
        .or_else(|| replaces.iter().find(|r| r.old.version.is_empty() && r.applies_to(module)))
}

/// Checks the structural rules every module path obeys.
///
/// # Errors
///
/// Returns [`ModinvError::EmptyModulePath`] for an empty path and
/// [`ModinvError::BackslashInModulePath`] if the path contains `\`.
pub fn check_path(path: &str, context: &str) -> Result<(), ModinvError> {
    if path.is_empty() {
        return Err(ModinvError::EmptyModulePath {
            context: context.to_string(),
        });
    }
    if path.contains('\\') {
        return Err(ModinvError::BackslashInModulePath {
            path: path.to_string(),
        });
    }
    Ok(())
}
