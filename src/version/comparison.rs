//! Version comparison utilities for update detection.
//!
//! These helpers answer the two questions enrichment asks of a version list:
//! "which one is latest?" and "is that newer than what we have?". Malformed
//! version strings in a list are ignored rather than treated as errors.
//!
//! # Examples
//!
//! ```rust,no_run
//! use modinv_cli::version::VersionComparator;
//!
//! let versions = vec![
//!     "v1.0.0".to_string(),
//!     "v1.1.0".to_string(),
//!     "v2.0.0-rc.1".to_string(),
//! ];
//!
//! // Releases win over pre-releases
//! assert_eq!(VersionComparator::latest(&versions), Some(&"v1.1.0".to_string()));
//! assert!(VersionComparator::is_newer("v1.1.0", "v1.0.0"));
//! ```

use std::cmp::Ordering;

use super::{compare, is_pseudo_version, is_stable, is_valid};

/// Version comparison utilities for module version lists.
pub struct VersionComparator;

impl VersionComparator {
    /// Whether `candidate` is strictly newer than `current`.
    ///
    /// An invalid `candidate` is never newer. An invalid `current` (a raw
    /// revision, say) is older than any valid candidate.
    #[must_use]
    pub fn is_newer(candidate: &str, current: &str) -> bool {
        is_valid(candidate) && compare(candidate, current) == Ordering::Greater
    }

    /// Picks the version `latest` should resolve to.
    ///
    /// The highest release wins. Without releases, the highest tagged
    /// pre-release wins, and without those, the highest pseudo-version.
    /// Returns `None` if the list holds no valid versions.
    #[must_use]
    pub fn latest(versions: &[String]) -> Option<&String> {
        let highest = |keep: &dyn Fn(&str) -> bool| {
            versions.iter().filter(|v| keep(v.as_str())).max_by(|a, b| compare(a, b))
        };

        highest(&is_stable)
            .or_else(|| highest(&|v| is_valid(v) && !is_pseudo_version(v)))
            .or_else(|| highest(&is_pseudo_version))
    }
}
