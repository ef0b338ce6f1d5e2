//! JSON manifests: `Godeps/Godeps.json`, `vendor/manifest`, `vendor/vendor.json`.
//!
//! All three need a JSON document; empty content is an error.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{ManifestConverter, decode, require_entry};
use crate::core::ModinvError;
use crate::modfile::CanonicalFile;

fn parse<T: DeserializeOwned>(file: &str, data: &[u8]) -> Result<T, ModinvError> {
    serde_json::from_str(decode(file, data)?).map_err(|e| ModinvError::ConversionFailed {
        file: file.to_string(),
        reason: e.to_string(),
    })
}

fn collect<'e>(
    module_path: &str,
    file: &str,
    entries: impl Iterator<Item = (&'e str, &'e str)>,
) -> Result<CanonicalFile, ModinvError> {
    let mut out = CanonicalFile::new(module_path);
    for (index, (path, revision)) in entries.enumerate() {
        require_entry(&mut out, file, index + 1, path, revision)?;
    }
    Ok(out)
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Godeps {
    #[serde(default)]
    deps: Vec<GodepsDep>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GodepsDep {
    #[serde(default)]
    import_path: String,
    #[serde(default)]
    rev: String,
}

/// godep's `Godeps/Godeps.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GodepsJson;

impl GodepsJson {
    /// Registered file name.
    pub const FILE_NAME: &'static str = "Godeps/Godeps.json";
}

impl ManifestConverter for GodepsJson {
    fn convert(&self, module_path: &str, data: &[u8]) -> Result<CanonicalFile, ModinvError> {
        let doc: Godeps = parse(Self::FILE_NAME, data)?;
        collect(
            module_path,
            Self::FILE_NAME,
            doc.deps.iter().map(|d| (d.import_path.as_str(), d.rev.as_str())),
        )
    }
}

#[derive(Deserialize)]
struct Manifest {
    #[serde(default)]
    dependencies: Vec<ManifestDependency>,
}

#[derive(Deserialize)]
struct ManifestDependency {
    #[serde(default)]
    importpath: String,
    #[serde(default)]
    revision: String,
}

/// gvt's `vendor/manifest`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VendorManifest;

impl VendorManifest {
    /// Registered file name.
    pub const FILE_NAME: &'static str = "vendor/manifest";
}

impl ManifestConverter for VendorManifest {
    fn convert(&self, module_path: &str, data: &[u8]) -> Result<CanonicalFile, ModinvError> {
        let doc: Manifest = parse(Self::FILE_NAME, data)?;
        collect(
            module_path,
            Self::FILE_NAME,
            doc.dependencies.iter().map(|d| (d.importpath.as_str(), d.revision.as_str())),
        )
    }
}

#[derive(Deserialize)]
struct Govendor {
    #[serde(default)]
    package: Vec<GovendorPackage>,
}

#[derive(Deserialize)]
struct GovendorPackage {
    #[serde(default)]
    path: String,
    #[serde(default)]
    revision: String,
}

/// govendor's `vendor/vendor.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VendorJson;

impl VendorJson {
    /// Registered file name.
    pub const FILE_NAME: &'static str = "vendor/vendor.json";
}

impl ManifestConverter for VendorJson {
    fn convert(&self, module_path: &str, data: &[u8]) -> Result<CanonicalFile, ModinvError> {
        let doc: Govendor = parse(Self::FILE_NAME, data)?;
        collect(
            module_path,
            Self::FILE_NAME,
            doc.package.iter().map(|p| (p.path.as_str(), p.revision.as_str())),
        )
    }
}
