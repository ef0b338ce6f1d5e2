//! List modules of the build list.
//!
//! The `list` command resolves module selectors against the build list
//! snapshot (`modinv.lock`) and prints one line per selected module.
//!
//! # Examples
//!
//! Show the root module:
//! ```bash
//! modinv list
//! ```
//!
//! Show every dependency with available updates:
//! ```bash
//! modinv list -u all
//! ```
//!
//! Show the known versions of a group of modules:
//! ```bash
//! modinv list --versions 'golang.org/x/...'
//! ```
//!
//! Resolve a version query:
//! ```bash
//! modinv list 'github.com/a/b@<v2'
//! ```
//!
//! # Selectors
//!
//! - `path` - the build list entry with exactly this path
//! - `path@query` - the version `query` resolves to, in or out of the build list
//! - a path containing `...` - every matching build list entry
//! - `all` - every build list entry
//!
//! Selectors containing a backslash and relative paths (`./x`, `../x`) are
//! rejected before anything is loaded.
//!
//! # Output
//!
//! ```text
//! example.com/app
//! github.com/a/b v1.2.0 [v1.3.0] => github.com/fork/b v1.2.1
//! ```
//!
//! Warnings about selectors that matched nothing go to stderr.

mod formatters;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

use crate::buildlist::{BuildListAccessor, LockfileLoader};
use crate::config::GlobalConfig;
use crate::constants::DEFAULT_INDEX_NAME;
use crate::listing::{EnrichOptions, ListOptions, Resolution, Selector, list_modules};
use crate::query::IndexQueryService;

pub use formatters::{format_json, format_text};

/// Command to list modules selected from the build list.
#[derive(Args, Debug, Clone, Default)]
pub struct ListCommand {
    /// Show available updates
    ///
    /// Attaches the newest known version to every module that has a newer
    /// version than the one selected, and prints it in brackets.
    #[arg(short = 'u', long)]
    update: bool,

    /// Show all known versions instead of the selected one
    #[arg(long)]
    versions: bool,

    /// Output a JSON array instead of text
    #[arg(long)]
    json: bool,

    /// Build list snapshot to read
    ///
    /// Defaults to the `lockfile` setting of the global configuration,
    /// `modinv.lock`, in the current directory.
    #[arg(long, value_name = "FILE")]
    lockfile: Option<PathBuf>,

    /// Version index answering version queries
    ///
    /// Defaults to the `index` setting of the global configuration, then to
    /// `versions.toml` in the current directory. A missing index behaves as an
    /// empty one.
    #[arg(long, value_name = "FILE")]
    index: Option<PathBuf>,

    /// Module selectors (path, path@query, pattern with `...`, or `all`)
    #[arg(value_name = "SELECTOR")]
    selectors: Vec<String>,
}

impl ListCommand {
    /// Resolves the selectors and prints the result.
    ///
    /// # Errors
    ///
    /// Fails on invalid selectors, an unreadable build list snapshot or
    /// version index, and output serialization failures.
    pub async fn execute_with_config(self, config: &GlobalConfig) -> Result<()> {
        let resolution = self.resolve(config).await?;

        for warning in &resolution.warnings {
            eprintln!("{} {}", "warning:".yellow().bold(), warning);
        }

        if self.json {
            println!("{}", format_json(&resolution.modules)?);
        } else {
            print!("{}", format_text(&resolution.modules, self.versions));
        }
        Ok(())
    }

    async fn resolve(&self, config: &GlobalConfig) -> Result<Resolution> {
        let lockfile = self.lockfile.clone().unwrap_or_else(|| PathBuf::from(&config.lockfile));
        let index = self
            .index
            .clone()
            .or_else(|| config.index.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_NAME));
        debug!("Listing from '{}' with index '{}'", lockfile.display(), index.display());

        let selectors =
            self.selectors.iter().map(|arg| Selector::parse(arg)).collect::<Result<Vec<_>, _>>()?;
        let needs_index = self.update
            || self.versions
            || selectors.iter().any(|s| matches!(s, Selector::VersionQuery { .. }));
        let query = if needs_index {
            IndexQueryService::load(&index).await?
        } else {
            debug!("No version queries needed, skipping index '{}'", index.display());
            IndexQueryService::new()
        };
        let build_list = BuildListAccessor::new(LockfileLoader::new(lockfile));
        let options = ListOptions {
            enrich: EnrichOptions {
                update: self.update,
                versions: self.versions,
            },
            max_parallel: config.effective_parallelism(),
        };

        Ok(list_modules(&self.selectors, &build_list, &query, options).await?)
    }
}
