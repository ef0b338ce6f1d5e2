//! Conversion of legacy dependency manifests into a [`CanonicalFile`].
//!
//! Each supported legacy format has a [`ManifestConverter`] registered under
//! the file name the format uses on disk. The [`ConverterRegistry`] is built
//! once and only read afterwards; supporting a new format means implementing
//! the trait and registering it, nothing else.
//!
//! # Supported Formats
//!
//! | File | Tool | Converter |
//! |------|------|-----------|
//! | `GLOCKFILE` | glock | [`lines::Glockfile`] |
//! | `Godeps/Godeps.json` | godep | [`json::GodepsJson`] |
//! | `Gopkg.lock` | dep | [`gopkg::GopkgLock`] |
//! | `dependencies.tsv` | godeps | [`lines::DependenciesTsv`] |
//! | `glide.lock` | glide | [`yaml::GlideLock`] |
//! | `vendor.conf` | vndr / trash | [`lines::VendorConf`] |
//! | `vendor.yml` | govend | [`yaml::VendorYml`] |
//! | `vendor/manifest` | gvt / gb | [`json::VendorManifest`] |
//! | `vendor/vendor.json` | govendor | [`json::VendorJson`] |
//!
//! # Contract
//!
//! Converters are pure: they see only the bytes they are given and produce
//! the same output for the same input. Malformed content is an error value.
//! Empty content converts to an empty file, except for JSON formats, which
//! need a document.

pub mod gopkg;
pub mod json;
pub mod lines;
pub mod yaml;

use std::fmt;
use tracing::debug;

use crate::core::ModinvError;
use crate::modfile::CanonicalFile;

/// Converts one legacy manifest format.
pub trait ManifestConverter: Send + Sync {
    /// Converts `data` into the canonical file of `module_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ModinvError::ConversionFailed`] or
    /// [`ModinvError::ConversionParse`] for malformed content.
    fn convert(&self, module_path: &str, data: &[u8]) -> Result<CanonicalFile, ModinvError>;
}

/// Table of converters keyed by manifest file name.
pub struct ConverterRegistry {
    converters: Vec<(String, Box<dyn ManifestConverter>)>,
}

impl ConverterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    /// Creates a registry with every built-in format.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new()
            .register(lines::Glockfile::FILE_NAME, lines::Glockfile)
            .register(json::GodepsJson::FILE_NAME, json::GodepsJson)
            .register(gopkg::GopkgLock::FILE_NAME, gopkg::GopkgLock)
            .register(lines::DependenciesTsv::FILE_NAME, lines::DependenciesTsv)
            .register(yaml::GlideLock::FILE_NAME, yaml::GlideLock)
            .register(lines::VendorConf::FILE_NAME, lines::VendorConf)
            .register(yaml::VendorYml::FILE_NAME, yaml::VendorYml)
            .register(json::VendorManifest::FILE_NAME, json::VendorManifest)
            .register(json::VendorJson::FILE_NAME, json::VendorJson)
    }

    /// Registers `converter` under `name`, replacing any earlier registration.
    #[must_use]
    pub fn register(
        mut self,
        name: impl Into<String>,
        converter: impl ManifestConverter + 'static,
    ) -> Self {
        let name = name.into();
        self.converters.retain(|(existing, _)| *existing != name);
        self.converters.push((name, Box::new(converter)));
        self
    }

    /// The converter registered under `name`, matched exactly.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn ManifestConverter> {
        self.converters.iter().find(|(registered, _)| registered == name).map(|(_, c)| c.as_ref())
    }

    /// Registered file names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.converters.iter().map(|(name, _)| name.as_str())
    }

    /// Number of registered formats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Converts `data` using the converter registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ModinvError::UnknownManifest`] if `name` is not registered,
    /// otherwise whatever the converter returns.
    pub fn convert(
        &self,
        name: &str,
        module_path: &str,
        data: &[u8],
    ) -> Result<CanonicalFile, ModinvError> {
        let converter = self.get(name).ok_or_else(|| ModinvError::UnknownManifest {
            name: name.to_string(),
        })?;
        debug!("Converting '{}' ({} bytes) for '{}'", name, data.len(), module_path);
        converter.convert(module_path, data)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry").field("names", &self.names().collect::<Vec<_>>()).finish()
    }
}

/// Decodes manifest bytes as UTF-8.
pub(crate) fn decode<'a>(file: &str, data: &'a [u8]) -> Result<&'a str, ModinvError> {
    std::str::from_utf8(data).map_err(|e| ModinvError::ConversionFailed {
        file: file.to_string(),
        reason: format!("content is not UTF-8: {e}"),
    })
}

/// Records one structured (non line-oriented) manifest entry.
pub(crate) fn require_entry(
    out: &mut CanonicalFile,
    file: &str,
    entry: usize,
    path: &str,
    version: &str,
) -> Result<(), ModinvError> {
    let failed = |reason: String| ModinvError::ConversionFailed {
        file: file.to_string(),
        reason: format!("entry {entry}: {reason}"),
    };
    if path.is_empty() {
        return Err(failed("missing import path".to_string()));
    }
    if version.is_empty() {
        return Err(failed(format!("missing revision for {path}")));
    }
    out.add_require(path, version).map_err(|e| failed(e.to_string()))?;
    Ok(())
}

/// Turns a repository URL into a module path (`https://github.com/a/b.git` to
/// `github.com/a/b`).
pub(crate) fn repository_path(repository: &str) -> &str {
    let trimmed = ["https://", "http://", "git://", "ssh://"]
        .iter()
        .find_map(|scheme| repository.strip_prefix(scheme))
        .unwrap_or(repository);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    trimmed.strip_suffix(".git").unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_contents() {
        let registry = ConverterRegistry::with_defaults();
        let names: Vec<&str> = registry.names().collect();

        assert_eq!(
            names,
            vec![
                "GLOCKFILE",
                "Godeps/Godeps.json",
                "Gopkg.lock",
                "dependencies.tsv",
                "glide.lock",
                "vendor.conf",
                "vendor.yml",
                "vendor/manifest",
                "vendor/vendor.json",
            ]
        );
        assert!(registry.get("glide.lock").is_some());
        assert!(registry.get("Glide.lock").is_none());
    }

    #[test]
    fn test_unknown_manifest() {
        let registry = ConverterRegistry::with_defaults();
        assert!(matches!(
            registry.convert("package.json", "example.com/app", b"{}"),
            Err(ModinvError::UnknownManifest { .. })
        ));
    }

    struct Fixed;

    impl ManifestConverter for Fixed {
        fn convert(&self, module_path: &str, _data: &[u8]) -> Result<CanonicalFile, ModinvError> {
            let mut file = CanonicalFile::new(module_path);
            file.add_require("fixed.com/x", "v1.0.0")?;
            Ok(file)
        }
    }

    #[test]
    fn test_register_extends_and_replaces() {
        let registry = ConverterRegistry::with_defaults().register("deps.lst", Fixed);
        assert_eq!(registry.len(), 10);
        let file = registry.convert("deps.lst", "example.com/app", b"").unwrap();
        assert_eq!(file.requires[0].path, "fixed.com/x");

        let replaced = registry.register("GLOCKFILE", Fixed);
        assert_eq!(replaced.len(), 10);
        assert_eq!(replaced.names().last(), Some("GLOCKFILE"));
    }

    #[test]
    fn test_repository_path() {
        assert_eq!(repository_path("https://github.com/a/b.git"), "github.com/a/b");
        assert_eq!(repository_path("github.com/a/b"), "github.com/a/b");
        assert_eq!(repository_path("git://example.org/x/"), "example.org/x");
    }
}
