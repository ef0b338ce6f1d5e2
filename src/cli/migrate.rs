//! Migration command converting legacy dependency manifests.
//!
//! This module provides the `migrate` command. It looks for every legacy
//! manifest the converter registry knows (`Gopkg.lock`, `glide.lock`,
//! `vendor/vendor.json`, ...) in a project directory, converts each one and
//! reports the outcome per file. The first successful conversion is printed
//! to stdout as the canonical dependency file; status lines go to stderr.

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::ModinvError;
use crate::modconv::ConverterRegistry;
use crate::modfile::CanonicalFile;

/// Outcome of converting one legacy manifest.
#[derive(Debug)]
pub struct FileReport {
    /// Registered file name, relative to the project directory
    pub name: String,
    /// The conversion result
    pub result: Result<CanonicalFile, ModinvError>,
}

/// Command to convert legacy dependency manifests into a canonical file.
#[derive(Parser, Debug, Clone)]
#[command(name = "migrate")]
pub struct MigrateCommand {
    /// Project directory to search (defaults to current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Module path the converted file declares
    #[arg(short, long)]
    module: String,

    /// Output format for the converted file (text, json)
    #[arg(short = 'f', long, default_value = "text")]
    format: String,
}

impl MigrateCommand {
    /// Execute the migrate command with the default converter registry.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be resolved, the format is unknown, or
    /// every manifest found fails to be read or converted.
    pub async fn execute(self) -> Result<()> {
        self.execute_with_registry(&ConverterRegistry::with_defaults()).await
    }

    /// Execute the migrate command against `registry`.
    ///
    /// # Errors
    ///
    /// See [`MigrateCommand::execute`].
    pub async fn execute_with_registry(self, registry: &ConverterRegistry) -> Result<()> {
        if !matches!(self.format.as_str(), "text" | "json") {
            bail!("Invalid format '{}'. Valid formats are: text, json", self.format);
        }

        let dir = self.path.as_deref().unwrap_or_else(|| Path::new("."));
        let dir = dir.canonicalize().context("Failed to resolve directory path")?;
        eprintln!("🔍 Checking for legacy manifests in: {}", dir.display());

        let reports = convert_all(registry, &dir, &self.module).await;
        if reports.is_empty() {
            eprintln!("✅ {}", "No legacy manifests found.".green());
            return Ok(());
        }

        for report in &reports {
            match &report.result {
                Ok(file) => eprintln!(
                    "  {} {} ({} requirements)",
                    "✓".green(),
                    report.name,
                    file.requires.len()
                ),
                Err(e) => eprintln!("  {} {}: {}", "✗".red(), report.name, e),
            }
        }

        let Some((name, converted)) = reports
            .iter()
            .find_map(|r| r.result.as_ref().ok().map(|file| (r.name.as_str(), file)))
        else {
            bail!("None of the {} legacy manifests could be converted", reports.len());
        };

        debug!("Rendering conversion of '{}'", name);
        if self.format == "json" {
            let json =
                serde_json::to_string_pretty(converted).context("Failed to serialize converted file")?;
            println!("{json}");
        } else {
            print!("{converted}");
        }
        Ok(())
    }
}

/// Converts every registered manifest present in `dir`, in registry order.
///
/// A manifest that cannot be read or converted is recorded as a failed report
/// and does not stop the others.
pub async fn convert_all(
    registry: &ConverterRegistry,
    dir: &Path,
    module_path: &str,
) -> Vec<FileReport> {
    let mut reports = Vec::new();
    for name in registry.names() {
        let file = dir.join(name);
        if !tokio::fs::try_exists(&file).await.unwrap_or(false) {
            continue;
        }

        let result = match tokio::fs::read(&file).await {
            Ok(data) => registry.convert(name, module_path, &data),
            Err(e) => {
                debug!("Failed to read '{}': {}", file.display(), e);
                Err(ModinvError::IoError {
                    operation: "read".to_string(),
                    path: file.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };
        reports.push(FileReport {
            name: name.to_string(),
            result,
        });
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn command(dir: &Path) -> MigrateCommand {
        MigrateCommand {
            path: Some(dir.to_path_buf()),
            module: "example.com/app".to_string(),
            format: "text".to_string(),
        }
    }

    #[tokio::test]
    async fn test_migrate_no_files() {
        let temp_dir = TempDir::new().unwrap();
        assert!(command(temp_dir.path()).execute().await.is_ok());
    }

    #[tokio::test]
    async fn test_convert_all_reports_each_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("GLOCKFILE"), "github.com/a/b abc123\n").unwrap();
        fs::write(temp_dir.path().join("glide.lock"), "imports: [oops").unwrap();
        fs::create_dir_all(temp_dir.path().join("vendor")).unwrap();
        fs::write(temp_dir.path().join("vendor/vendor.json"), r#"{"package": []}"#).unwrap();

        let reports =
            convert_all(&ConverterRegistry::with_defaults(), temp_dir.path(), "example.com/app").await;

        let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["GLOCKFILE", "glide.lock", "vendor/vendor.json"]);
        assert!(reports[0].result.is_ok());
        assert!(reports[1].result.is_err());
        assert!(reports[2].result.is_ok());
    }

    #[tokio::test]
    async fn test_unreadable_manifest_does_not_stop_others() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("GLOCKFILE"), "github.com/a/b abc123\n").unwrap();
        fs::create_dir_all(temp_dir.path().join("vendor/manifest")).unwrap();

        let reports =
            convert_all(&ConverterRegistry::with_defaults(), temp_dir.path(), "example.com/app").await;

        assert_eq!(reports.len(), 2);
        assert!(reports[0].result.is_ok());
        assert_eq!(reports[1].name, "vendor/manifest");
        assert!(matches!(reports[1].result, Err(ModinvError::IoError { .. })));
        assert!(command(temp_dir.path()).execute().await.is_ok());
    }

    #[tokio::test]
    async fn test_migrate_partial_failure_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("Gopkg.lock"), "[[projects]\n").unwrap();
        fs::write(temp_dir.path().join("vendor.conf"), "github.com/a/b v1.0.0\n").unwrap();

        assert!(command(temp_dir.path()).execute().await.is_ok());
    }

    #[tokio::test]
    async fn test_migrate_all_failures_is_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("GLOCKFILE"), "lonely-field\n").unwrap();

        let result = command(temp_dir.path()).execute().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_migrate_rejects_unknown_format() {
        let temp_dir = TempDir::new().unwrap();
        let mut cmd = command(temp_dir.path());
        cmd.format = "yaml".to_string();

        assert!(cmd.execute().await.is_err());
    }
}
