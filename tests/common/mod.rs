//! Shared helpers for integration tests.

#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Snapshot used by most CLI tests.
pub const SAMPLE_SNAPSHOT: &str = r#"
[root]
path = "example.com/app"

[[module]]
path = "github.com/a/b"
version = "v1.0.0"

[[module]]
path = "golang.org/x/text"
version = "v0.3.0"
indirect = true

[[replace]]
old = { path = "github.com/a/b" }
new = { path = "github.com/fork/b", version = "v1.0.1" }
"#;

/// Version index matching [`SAMPLE_SNAPSHOT`].
pub const SAMPLE_INDEX: &str = r#"
[modules]
"github.com/a/b" = ["v1.0.0", "v1.1.0"]
"github.com/fork/b" = ["v1.0.1", "v1.0.2"]
"golang.org/x/text" = ["v0.3.0"]
"#;

/// Temporary project directory with an isolated global configuration.
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
    config_path: PathBuf,
}

impl TestProject {
    /// Creates an empty project.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        fs::create_dir_all(&project_dir)?;
        let config_path = temp_dir.path().join("config.toml");

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
            config_path,
        })
    }

    /// Creates a project holding [`SAMPLE_SNAPSHOT`] and [`SAMPLE_INDEX`].
    pub fn with_sample() -> Result<Self> {
        let project = Self::new()?;
        project.write_file("modinv.lock", SAMPLE_SNAPSHOT)?;
        project.write_file("versions.toml", SAMPLE_INDEX)?;
        Ok(project)
    }

    /// The project directory.
    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    /// Writes a file relative to the project directory.
    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file = self.project_dir.join(path);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, content).with_context(|| format!("Failed to write {}", file.display()))
    }

    /// Writes the isolated global configuration.
    pub fn write_config(&self, content: &str) -> Result<()> {
        fs::write(&self.config_path, content).context("Failed to write global config")
    }

    /// A `modinv` command running in the project directory.
    pub fn modinv(&self) -> Command {
        let mut cmd = Command::cargo_bin("modinv").expect("modinv binary is built");
        cmd.current_dir(&self.project_dir)
            .env("MODINV_CONFIG", &self.config_path)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}
