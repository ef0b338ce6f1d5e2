//! Global constants used throughout the modinv codebase.
//!
//! This module contains selector tokens, default file names, and the
//! enrichment parallelism ceiling.

/// Selector that matches every build list entry unconditionally.
///
/// This is a fixed token, not a glob: `all` never matches anything other
/// than "everything", and `all...` is an ordinary wildcard pattern.
pub const UNIVERSAL_SELECTOR: &str = "all";

/// Wildcard marker that turns a selector into a pattern.
pub const WILDCARD_MARKER: &str = "...";

/// Constraint used for provisional lookups and update checks.
pub const LATEST_QUERY: &str = "latest";

/// Default ceiling for simultaneous in-flight version queries during enrichment.
pub const DEFAULT_ENRICH_PARALLELISM: usize = 10;

/// Default file name of the build list snapshot.
pub const DEFAULT_LOCKFILE_NAME: &str = "modinv.lock";

/// Default file name of the local version index.
pub const DEFAULT_INDEX_NAME: &str = "versions.toml";

/// Environment variable that overrides the global configuration path.
pub const CONFIG_PATH_ENV: &str = "MODINV_CONFIG";
