//! modinv - module inventory and legacy manifest migration
//!
//! modinv answers "which modules does this build use, and at which versions?"
//! from an already-selected build list, and converts the lock files of older
//! dependency tools into one canonical dependency file.
//!
//! # Architecture Overview
//!
//! Version selection happens elsewhere. modinv consumes its result, a build
//! list snapshot (`modinv.lock`), where index 0 is the root module and every
//! other entry is the single selected version of a dependency. Listing runs
//! in two phases:
//!
//! 1. **Selector resolution** ([`listing::resolve`]) classifies each argument
//!    as a version query, the universal token `all`, a `...` pattern or a
//!    literal path, and matches it against the build list. Output is ordered
//!    by argument and deduplicated by build list position.
//! 2. **Enrichment** ([`listing::enrich`]) attaches available updates and
//!    known version lists, querying a [`query::QueryService`] with bounded
//!    concurrency. Failures degrade single descriptors only.
//!
//! Migration is independent: the [`modconv::ConverterRegistry`] maps legacy
//! manifest file names to converters producing a [`modfile::CanonicalFile`].
//!
//! # Core Modules
//!
//! ## Listing
//! - [`buildlist`] - build list model, lazy loading, snapshot files
//! - [`listing`] - selector resolution and concurrent enrichment
//! - [`modinfo`] - public module descriptors and their assembly
//! - [`pattern`] - `...` wildcard matching
//! - [`query`] - version query service trait and the index-backed service
//!
//! ## Migration
//! - [`modconv`] - converter registry and the legacy format converters
//! - [`modfile`] - canonical dependency file model and rendering
//!
//! ## Supporting Modules
//! - [`cli`] - command-line interface
//! - [`config`] - global configuration (`~/.modinv/config.toml`)
//! - [`constants`] - selector tokens and defaults
//! - [`core`] - error types and user-facing error reporting
//! - [`module`] - module identities and replace directives
//! - [`version`] - module version parsing, ordering and queries
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Root module
//! modinv list
//!
//! # All dependencies with available updates
//! modinv list -u all
//!
//! # Known versions of a module family
//! modinv list --versions 'golang.org/x/...'
//!
//! # Convert Gopkg.lock, glide.lock, ... in ./legacy
//! modinv migrate --path ./legacy --module example.com/legacy
//! ```
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use modinv_cli::buildlist::{BuildListAccessor, LockfileLoader};
//! use modinv_cli::listing::{ListOptions, list_modules};
//! use modinv_cli::query::IndexQueryService;
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let build_list = BuildListAccessor::new(LockfileLoader::new("modinv.lock"));
//! let index = IndexQueryService::load(Path::new("versions.toml")).await?;
//!
//! let args = vec!["all".to_string()];
//! let resolution = list_modules(&args, &build_list, &index, ListOptions::default()).await?;
//! for module in &resolution.modules {
//!     println!("{} {}", module.path, module.version);
//! }
//! # Ok(())
//! # }
//! ```

// Listing
pub mod buildlist;
pub mod listing;
pub mod modinfo;
pub mod pattern;
pub mod query;

// Migration
pub mod modconv;
pub mod modfile;

// Supporting modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod module;
pub mod version;

// Test utilities (only compiled in test mode or with test-utils feature)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
