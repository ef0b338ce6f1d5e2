//! Wildcard matching for module path selectors.
//!
//! A module pattern is a module path containing one or more `...` wildcards.
//!
//! # Pattern Syntax
//!
//! - `...` matches any string, including the empty string and strings that
//!   contain `/`
//! - a trailing `/...` also matches the path without it, so
//!   `example.com/foo/...` matches `example.com/foo` itself
//! - every other character matches literally
//!
//! # Examples
//!
//! ```rust
//! use modinv_cli::pattern::PatternMatcher;
//!
//! let matcher = PatternMatcher::new("github.com/acme/...")?;
//! assert!(matcher.matches("github.com/acme"));
//! assert!(matcher.matches("github.com/acme/tools/v2"));
//! assert!(!matcher.matches("github.com/acmecorp"));
//! # Ok::<(), modinv_cli::core::ModinvError>(())
//! ```

use regex::Regex;
use tracing::trace;

use crate::constants::WILDCARD_MARKER;
use crate::core::ModinvError;

/// Compiled `...` pattern.
///
/// The pattern is compiled once into an anchored regular expression and can be
/// matched against any number of module paths.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
    original_pattern: String,
}

impl PatternMatcher {
    /// Compiles a wildcard pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ModinvError::Other`] if the generated expression fails to
    /// compile, which only happens for pathological pattern sizes.
    pub fn new(pattern: &str) -> Result<Self, ModinvError> {
        let mut body = String::with_capacity(pattern.len() + 8);
        let (stem, optional_tail) = match pattern.strip_suffix("/...") {
            Some(stem) => (stem, true),
            None => (pattern, false),
        };

        for (i, literal) in stem.split(WILDCARD_MARKER).enumerate() {
            if i > 0 {
                body.push_str(".*");
            }
            body.push_str(&regex::escape(literal));
        }
        if optional_tail {
            body.push_str("(/.*)?");
        }

        let regex = Regex::new(&format!("^{body}$")).map_err(|e| ModinvError::Other {
            message: format!("Invalid module pattern '{pattern}': {e}"),
        })?;
        trace!("Compiled module pattern '{}' to '{}'", pattern, regex.as_str());

        Ok(Self {
            regex,
            original_pattern: pattern.to_string(),
        })
    }

    /// Whether `path` matches the pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// The pattern as given to [`PatternMatcher::new`].
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.original_pattern
    }
}

/// Whether `selector` is a wildcard pattern.
#[must_use]
pub fn is_pattern(selector: &str) -> bool {
    selector.contains(WILDCARD_MARKER)
}
