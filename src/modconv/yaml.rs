//! YAML manifests: `glide.lock` and `vendor.yml`.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{ManifestConverter, decode, require_entry};
use crate::core::ModinvError;
use crate::modfile::CanonicalFile;

/// Parses a YAML document; blank content yields `None`.
fn parse<T: DeserializeOwned>(file: &str, data: &[u8]) -> Result<Option<T>, ModinvError> {
    let text = decode(file, data)?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_yaml::from_str(text).map(Some).map_err(|e| ModinvError::ConversionFailed {
        file: file.to_string(),
        reason: e.to_string(),
    })
}

#[derive(Deserialize)]
struct Glide {
    #[serde(default)]
    imports: Vec<GlideImport>,
}

#[derive(Deserialize)]
struct GlideImport {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
}

/// glide's `glide.lock`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlideLock;

impl GlideLock {
    /// Registered file name.
    pub const FILE_NAME: &'static str = "glide.lock";
}

impl ManifestConverter for GlideLock {
    fn convert(&self, module_path: &str, data: &[u8]) -> Result<CanonicalFile, ModinvError> {
        let mut out = CanonicalFile::new(module_path);
        let Some(doc) = parse::<Glide>(Self::FILE_NAME, data)? else {
            return Ok(out);
        };
        for (index, import) in doc.imports.iter().enumerate() {
            require_entry(&mut out, Self::FILE_NAME, index + 1, &import.name, &import.version)?;
        }
        Ok(out)
    }
}

#[derive(Deserialize)]
struct Govend {
    #[serde(default)]
    vendors: Vec<GovendVendor>,
}

#[derive(Deserialize)]
struct GovendVendor {
    #[serde(default)]
    path: String,
    #[serde(default)]
    rev: String,
}

/// govend's `vendor.yml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VendorYml;

impl VendorYml {
    /// Registered file name.
    pub const FILE_NAME: &'static str = "vendor.yml";
}

impl ManifestConverter for VendorYml {
    fn convert(&self, module_path: &str, data: &[u8]) -> Result<CanonicalFile, ModinvError> {
        let mut out = CanonicalFile::new(module_path);
        let Some(doc) = parse::<Govend>(Self::FILE_NAME, data)? else {
            return Ok(out);
        };
        for (index, vendor) in doc.vendors.iter().enumerate() {
            require_entry(&mut out, Self::FILE_NAME, index + 1, &vendor.path, &vendor.rev)?;
        }
        Ok(out)
    }
}
