//! Command-line interface for modinv.
//!
//! # Available Commands
//!
//! - `list` - list modules selected from the build list snapshot, optionally
//!   with available updates or all known versions
//! - `migrate` - convert legacy dependency manifests into a canonical file
//!
//! # Command Usage Patterns
//!
//! ```bash
//! # Root module of the snapshot in the current directory
//! modinv list
//!
//! # Everything, with updates, as JSON
//! modinv list -u --json all
//!
//! # Convert a dep project
//! modinv migrate --path ./legacy --module example.com/legacy
//! ```
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` set the log level (`RUST_LOG` wins over both)
//! - `--config` points at a global configuration file other than
//!   `~/.modinv/config.toml`
//!
//! Logs are written to stderr so that stdout only carries command output.

pub mod list;
pub mod migrate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::GlobalConfig;

pub use list::ListCommand;
pub use migrate::MigrateCommand;

/// Runtime settings derived from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// Explicit global configuration path
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Installs the tracing subscriber. Later calls are no-ops.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("modinv_cli={}", self.log_level)));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Module inventory and legacy manifest migration.
#[derive(Parser, Debug)]
#[command(
    name = "modinv",
    about = "Inventory module dependencies and migrate legacy lock files",
    version,
    long_about = "modinv lists the modules of a selected build list, reports available updates and known versions, and converts legacy dependency manifests into a canonical dependency file."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    ///
    /// Equivalent to `RUST_LOG=debug`. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the global configuration file
    ///
    /// Overrides `MODINV_CONFIG` and the default `~/.modinv/config.toml`.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List modules selected from the build list
    List(ListCommand),

    /// Convert legacy dependency manifests into a canonical file
    Migrate(MigrateCommand),
}

impl Cli {
    /// Execute the parsed command line.
    ///
    /// # Errors
    ///
    /// Returns the command's error; `main` turns it into a user-facing message.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Translates the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
        }
    }

    /// Execute with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Fails if the global configuration cannot be loaded or the command fails.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::List(cmd) => {
                let global = GlobalConfig::load_with_optional(config.config_path).await?;
                debug!("Global config: {:?}", global);
                cmd.execute_with_config(&global).await
            }
            Commands::Migrate(cmd) => cmd.execute().await,
        }
    }
}
