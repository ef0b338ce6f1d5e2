//! Selector classification.

use std::fmt;

use crate::constants::UNIVERSAL_SELECTOR;
use crate::core::ModinvError;
use crate::pattern::{self, PatternMatcher};

/// One classified command-line argument.
#[derive(Debug, Clone)]
pub enum Selector {
    /// `path@constraint`, resolved through the query service
    VersionQuery {
        /// Module path before the first `@`
        path: String,
        /// Everything after the first `@`, possibly empty
        constraint: String,
    },
    /// The universal token, matching every build list entry
    Universal,
    /// A `...` wildcard pattern
    Pattern(PatternMatcher),
    /// An exact module path
    Literal(String),
}

impl Selector {
    /// Classifies `arg`.
    ///
    /// # Errors
    ///
    /// All errors are fatal for the invocation:
    /// [`ModinvError::BackslashInModulePath`] if `arg` contains a backslash,
    /// [`ModinvError::RelativePathSelector`] for `.`, `..`, `./x` and `../x`,
    /// and [`ModinvError::EmptyModulePath`] for an empty argument or an empty
    /// path before `@`.
    pub fn parse(arg: &str) -> Result<Self, ModinvError> {
        if arg.contains('\\') {
            return Err(ModinvError::BackslashInModulePath {
                path: arg.to_string(),
            });
        }
        if is_relative_path(arg) {
            return Err(ModinvError::RelativePathSelector {
                selector: arg.to_string(),
            });
        }
        if arg.is_empty() {
            return Err(ModinvError::EmptyModulePath {
                context: "selector".to_string(),
            });
        }

        if let Some((path, constraint)) = arg.split_once('@') {
            if path.is_empty() {
                return Err(ModinvError::EmptyModulePath {
                    context: arg.to_string(),
                });
            }
            return Ok(Self::VersionQuery {
                path: path.to_string(),
                constraint: constraint.to_string(),
            });
        }

        if arg == UNIVERSAL_SELECTOR {
            Ok(Self::Universal)
        } else if pattern::is_pattern(arg) {
            Ok(Self::Pattern(PatternMatcher::new(arg)?))
        } else {
            Ok(Self::Literal(arg.to_string()))
        }
    }

    /// Whether this selector matches a build list entry with `path`.
    ///
    /// Version queries never match build list entries.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::VersionQuery {
                ..
            } => false,
            Self::Universal => true,
            Self::Pattern(matcher) => matcher.matches(path),
            Self::Literal(literal) => literal == path,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VersionQuery {
                path,
                constraint,
            } => write!(f, "{path}@{constraint}"),
            Self::Universal => f.write_str(UNIVERSAL_SELECTOR),
            Self::Pattern(matcher) => f.write_str(matcher.pattern()),
            Self::Literal(path) => f.write_str(path),
        }
    }
}

/// Whether `arg` names a path relative to the working directory.
fn is_relative_path(arg: &str) -> bool {
    arg == "." || arg == ".." || arg.starts_with("./") || arg.starts_with("../")
}
