//! Public module descriptors.
//!
//! [`ModulePublicInfo`] is what listing hands to formatters: the module
//! identity, an optional replacement target, and whatever enrichment attached
//! (`update`, `versions`). [`ModuleInfoAssembler`] builds descriptors from the
//! build list.
//!
//! Enrichment reaches descriptors through [`EnrichSlot`]s. A slot borrows the
//! identity and the two write-once enrichment fields of exactly one descriptor,
//! whether that descriptor is a top-level entry or a replacement target, so the
//! enrichment engine treats both the same way.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::buildlist::BuildList;
use crate::module::ModuleVersion;

/// Why a descriptor could not be fully resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleError {
    /// Error message
    pub err: String,
}

impl fmt::Display for ModuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.err)
    }
}

/// Descriptor of one module as presented to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePublicInfo {
    /// Module path
    pub path: String,
    /// Selected version, the unresolved query for failed queries, or empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Whether this is the root module
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub main: bool,
    /// Whether the dependency was recorded as indirect
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub indirect: bool,
    /// Directory of a local replacement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Replacement target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<Box<ModulePublicInfo>>,
    /// Newer version, if one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<Box<ModulePublicInfo>>,
    /// Known versions in ascending order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<String>>,
    /// Resolution error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ModuleError>,
}

impl ModulePublicInfo {
    /// Creates a plain descriptor.
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Creates a descriptor for an item that failed to resolve.
    ///
    /// `version` keeps whatever the user asked for, such as the unresolved
    /// query string.
    pub fn with_error(
        path: impl Into<String>,
        version: impl Into<String>,
        error: impl fmt::Display,
    ) -> Self {
        Self {
            error: Some(ModuleError {
                err: error.to_string(),
            }),
            ..Self::new(path, version)
        }
    }

    /// The module identity of this descriptor.
    #[must_use]
    pub fn identity(&self) -> ModuleVersion {
        ModuleVersion::new(self.path.clone(), self.version.clone())
    }

    /// Whether this descriptor carries an error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Borrows the enrichable parts of this descriptor and its replacement.
    ///
    /// The descriptor comes first, then its replacement target. Local
    /// directory replacements yield no slot. Error descriptors yield an
    /// unresolved slot, which only receives the version list.
    pub fn enrich_slots(&mut self) -> Vec<EnrichSlot<'_>> {
        let mut slots = Vec::with_capacity(2);
        self.push_slots(&mut slots);
        slots
    }

    fn push_slots<'a>(&'a mut self, slots: &mut Vec<EnrichSlot<'a>>) {
        let Self {
            path,
            version,
            dir,
            replace,
            update,
            versions,
            error,
            ..
        } = self;

        if dir.is_none() {
            slots.push(EnrichSlot {
                path,
                version,
                resolved: error.is_none(),
                update,
                versions,
            });
        }
        if let Some(target) = replace.as_deref_mut() {
            target.push_slots(slots);
        }
    }
}

/// Exclusive access to one descriptor's enrichment fields.
///
/// Identity fields are shared borrows; `update` and `versions` are mutable
/// borrows owned by whichever worker holds the slot.
#[derive(Debug)]
pub struct EnrichSlot<'a> {
    /// Module path
    pub path: &'a str,
    /// Current version, possibly empty
    pub version: &'a str,
    resolved: bool,
    update: &'a mut Option<Box<ModulePublicInfo>>,
    versions: &'a mut Option<Vec<String>>,
}

impl EnrichSlot<'_> {
    /// The identity this slot enriches.
    #[must_use]
    pub fn identity(&self) -> ModuleVersion {
        ModuleVersion::new(self.path, self.version)
    }

    /// Whether the descriptor resolved without error.
    ///
    /// The version of an unresolved descriptor is the query that failed.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Records a newer version.
    pub fn set_update(&mut self, version: &str) {
        *self.update = Some(Box::new(ModulePublicInfo::new(self.path, version)));
    }

    /// Records the known version list.
    pub fn set_versions(&mut self, versions: Vec<String>) {
        *self.versions = Some(versions);
    }
}

/// Builds descriptors for build list entries and standalone modules.
#[derive(Debug, Clone, Copy)]
pub struct ModuleInfoAssembler<'a> {
    build_list: &'a BuildList,
}

impl<'a> ModuleInfoAssembler<'a> {
    /// Creates an assembler reading replacements and flags from `build_list`.
    pub const fn new(build_list: &'a BuildList) -> Self {
        Self {
            build_list,
        }
    }

    /// Builds the descriptor for `module`.
    ///
    /// With `from_build_list` set, the module is a build list entry: the root
    /// is flagged `main` and other entries pick up their replacement and
    /// indirect flag. Standalone modules (query results) get neither.
    #[must_use]
    pub fn assemble(&self, module: &ModuleVersion, from_build_list: bool) -> ModulePublicInfo {
        let mut info = ModulePublicInfo::new(module.path.clone(), module.version.clone());
        if !from_build_list {
            return info;
        }

        if module.path == self.build_list.root().path {
            info.main = true;
            return info;
        }

        info.indirect = self.build_list.is_indirect(&module.path);
        if let Some(directive) = self.build_list.replacement(module) {
            let mut target =
                ModulePublicInfo::new(directive.new.path.clone(), directive.new.version.clone());
            if directive.is_local() {
                target.dir = Some(directive.new.path.clone());
            }
            info.replace = Some(Box::new(target));
        }
        info
    }
}
