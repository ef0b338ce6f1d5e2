//! Error handling for modinv
//!
//! This module provides the error types and user-friendly error reporting for
//! modinv. The error system follows two principles:
//! 1. **Strongly-typed errors** for precise handling inside the library
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`ModinvError`] - Enumerated error types for every failure mode
//! - [`ErrorContext`] - Wrapper that adds suggestions and details for display
//!
//! # Error Channels
//!
//! modinv distinguishes two channels:
//! - **Fatal** errors abort a whole invocation. Selector validation failures
//!   ([`ModinvError::BackslashInModulePath`], [`ModinvError::RelativePathSelector`])
//!   are the canonical examples. They propagate with `?` to `main`, which is the
//!   only place the process exits.
//! - **Per-item** errors are attached to a single module descriptor as a
//!   [`ModuleError`](crate::modinfo::ModuleError) and never abort a batch. Query
//!   failures ([`ModinvError::ModuleNotFound`], [`ModinvError::NoMatchingVersion`])
//!   travel this way.
//!
//! Conversion failures from legacy manifests are returned as values so callers
//! can report status per file.
//!
//! # Examples
//!
//! ```rust,no_run
//! use modinv_cli::core::{ModinvError, ErrorContext, user_friendly_error};
//!
//! let error = ModinvError::RelativePathSelector {
//!     selector: "./foo".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // colored error with a suggestion
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for modinv operations.
///
/// Every variant carries owned strings only, so the type is cheap to clone and
/// can be compared in tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModinvError {
    /// A selector or module path contained a backslash.
    #[error("module paths never use backslash: '{path}'")]
    BackslashInModulePath {
        /// The offending path or selector
        path: String,
    },

    /// A selector was a filesystem-relative path such as `./foo`.
    #[error("cannot use relative path {selector} to specify module")]
    RelativePathSelector {
        /// The offending selector
        selector: String,
    },

    /// A selector or manifest entry had an empty module path.
    #[error("empty module path in '{context}'")]
    EmptyModulePath {
        /// Where the empty path was found
        context: String,
    },

    /// The version query service does not know the module.
    #[error("module {path}: not found")]
    ModuleNotFound {
        /// Module path that was queried
        path: String,
    },

    /// The module exists but no version satisfies the query.
    #[error("module {path}: no matching versions for query \"{query}\"")]
    NoMatchingVersion {
        /// Module path that was queried
        path: String,
        /// The query that matched nothing
        query: String,
    },

    /// A version constraint could not be parsed.
    #[error("invalid version constraint: {constraint}")]
    InvalidVersionConstraint {
        /// The malformed constraint
        constraint: String,
    },

    /// A legacy manifest could not be converted.
    #[error("failed to convert {file}: {reason}")]
    ConversionFailed {
        /// Registered manifest file name
        file: String,
        /// Parser message
        reason: String,
    },

    /// A line-oriented legacy manifest had a malformed line.
    #[error("{file}:{line}: {reason}")]
    ConversionParse {
        /// Registered manifest file name
        file: String,
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// No converter is registered under the given file name.
    #[error("no converter registered for '{name}'")]
    UnknownManifest {
        /// The unrecognized file name
        name: String,
    },

    /// The build list snapshot file does not exist.
    #[error("build list snapshot not found: {path}")]
    BuildListNotFound {
        /// Path that was searched
        path: String,
    },

    /// A build list (or its snapshot) violates the build list invariants.
    #[error("invalid build list {origin}: {reason}")]
    BuildListInvalid {
        /// Snapshot path, or a description of where the build list came from
        origin: String,
        /// What was wrong
        reason: String,
    },

    /// The global configuration could not be read or parsed.
    #[error("configuration error: {message}")]
    ConfigError {
        /// Error description
        message: String,
    },

    /// File system operation failed.
    #[error("I/O error during {operation} on {path}: {reason}")]
    IoError {
        /// What was being done
        operation: String,
        /// File involved
        path: String,
        /// Underlying error message
        reason: String,
    },

    /// Any other error.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information.
///
/// Wraps a [`ModinvError`] with an optional suggestion (printed green) and
/// optional details (printed yellow).
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ModinvError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: ModinvError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions.
///
/// Recognizes [`ModinvError`] (anywhere in the chain), [`std::io::Error`] and
/// [`toml::de::Error`]; anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(modinv_error) = error.chain().find_map(|e| e.downcast_ref::<ModinvError>()) {
        return create_error_context(modinv_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(ModinvError::IoError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                    reason: io_error.to_string(),
                })
                .with_suggestion("Check file ownership and permissions");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(ModinvError::IoError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                    reason: io_error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(ModinvError::Other {
            message: format!("TOML parsing error: {toml_error}"),
        })
        .with_suggestion("Check the TOML syntax. Verify quotes, brackets, and table headers");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(ModinvError::Other {
        message,
    })
}

fn create_error_context(error: ModinvError) -> ErrorContext {
    match &error {
        ModinvError::BackslashInModulePath { .. } => ErrorContext::new(error)
            .with_suggestion("Write module paths with forward slashes, e.g. 'example.com/foo/bar'"),

        ModinvError::RelativePathSelector { .. } => ErrorContext::new(error)
            .with_suggestion("Name the module by its module path instead of a directory")
            .with_details("Selectors are module paths, patterns containing '...', 'all', or 'path@version'"),

        ModinvError::BuildListNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Pass --lockfile, or run the command from a directory containing modinv.lock"),

        ModinvError::BuildListInvalid { .. } => ErrorContext::new(error)
            .with_details("A build list holds the root module first and at most one version per module path"),

        ModinvError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Check ~/.modinv/config.toml or the file passed with --config"),

        ModinvError::ConversionFailed { .. } | ModinvError::ConversionParse { .. } => {
            ErrorContext::new(error)
                .with_suggestion("Fix the legacy manifest or remove it before migrating")
        }

        ModinvError::UnknownManifest { .. } => ErrorContext::new(error).with_details(
            "Recognized files: GLOCKFILE, Godeps/Godeps.json, Gopkg.lock, dependencies.tsv, glide.lock, vendor.conf, vendor.yml, vendor/manifest, vendor/vendor.json",
        ),

        _ => ErrorContext::new(error),
    }
}
