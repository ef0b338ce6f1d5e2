//! Module version parsing and ordering.
//!
//! Module versions are semantic versions written with a mandatory `v` prefix
//! (`v1.2.3`, `v2.0.0-rc.1`, `v3.0.0+incompatible`). Pseudo-versions encode an
//! untagged revision as a pre-release (`v0.0.0-20180101120000-abcdef123456`)
//! and therefore sort below the release they precede.
//!
//! Strings that are not valid module versions (bare revisions from legacy lock
//! files, for instance) are still carried around as opaque strings; they sort
//! below every valid version and compare lexically among themselves.
//!
//! # Submodules
//!
//! - [`comparison`] - newest/latest selection over version lists
//! - [`constraints`] - parsing and evaluating version queries (`latest`, `v1.2`, `<v2`)

pub mod comparison;
pub mod constraints;

use regex::Regex;
use semver::Version;
use std::cmp::Ordering;
use std::sync::OnceLock;

pub use comparison::VersionComparator;
pub use constraints::VersionQuery;

/// Parses a canonical module version (`vMAJOR.MINOR.PATCH[-pre][+build]`).
///
/// Returns `None` for anything else, including versions without the `v`
/// prefix and shorthand forms like `v1.2`.
#[must_use]
pub fn parse_module_version(version: &str) -> Option<Version> {
    let stripped = version.strip_prefix('v')?;
    Version::parse(stripped).ok()
}

/// Whether `version` is a valid canonical module version.
#[must_use]
pub fn is_valid(version: &str) -> bool {
    parse_module_version(version).is_some()
}

/// Whether `version` is a pseudo-version naming an untagged revision.
#[must_use]
pub fn is_pseudo_version(version: &str) -> bool {
    static PSEUDO: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = PSEUDO.get_or_init(|| {
        Regex::new(r"^v[0-9]+\.(0\.0-|\d+\.\d+-([^+]*\.)?0\.)\d{14}-[A-Za-z0-9]+(\+[0-9A-Za-z-]+(\.[0-9A-Za-z-]+)*)?$")
            .ok()
    });

    pattern.as_ref().is_some_and(|re| re.is_match(version)) && is_valid(version)
}

/// Whether `version` is a release (not a pre-release and not a pseudo-version).
#[must_use]
pub fn is_stable(version: &str) -> bool {
    parse_module_version(version).is_some_and(|v| v.pre.is_empty())
}

/// Compares two module versions by semantic precedence.
///
/// Build metadata is ignored. Invalid versions sort below valid ones and fall
/// back to lexical order among themselves.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    match (parse_module_version(a), parse_module_version(b)) {
        (Some(va), Some(vb)) => precedence(&va, &vb),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

/// Semantic precedence of two parsed versions, ignoring build metadata.
pub(crate) fn precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch)
        .cmp(&(b.major, b.minor, b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

/// Sorts versions ascending by semantic precedence and removes duplicates.
pub fn sort_versions(versions: &mut Vec<String>) {
    versions.sort_by(|a, b| compare(a, b).then_with(|| a.cmp(b)));
    versions.dedup();
}
