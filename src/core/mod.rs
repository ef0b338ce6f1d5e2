//! Core types for modinv
//!
//! This module holds the error types shared by every other module:
//! - [`ModinvError`] - enumerated failure modes with owned context
//! - [`ErrorContext`] - user-facing wrapper with suggestions and details
//! - [`user_friendly_error`] - converts any [`anyhow::Error`] for CLI display
//!
//! Library code returns `Result<T, ModinvError>` where the failure is part of
//! the domain (selector validation, version queries, conversion) and
//! [`anyhow::Result`] with `.context(...)` where it crosses I/O boundaries.

pub mod error;

pub use error::{ErrorContext, ModinvError, user_friendly_error};
