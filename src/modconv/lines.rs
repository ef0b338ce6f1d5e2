//! Line-oriented manifests: `GLOCKFILE`, `dependencies.tsv`, `vendor.conf`.

use super::{ManifestConverter, decode, repository_path};
use crate::core::ModinvError;
use crate::modfile::CanonicalFile;

/// Iterates over `(line_number, line)` pairs, skipping blank lines.
fn numbered(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines().enumerate().map(|(i, line)| (i + 1, line)).filter(|(_, line)| !line.trim().is_empty())
}

fn parse_error(file: &str, line: usize, reason: impl Into<String>) -> ModinvError {
    ModinvError::ConversionParse {
        file: file.to_string(),
        line,
        reason: reason.into(),
    }
}

fn require_line(
    out: &mut CanonicalFile,
    file: &str,
    line: usize,
    path: &str,
    version: &str,
) -> Result<(), ModinvError> {
    out.add_require(path, version).map_err(|e| parse_error(file, line, e.to_string()))?;
    Ok(())
}

/// glock's `GLOCKFILE`: `path revision` lines, `cmd path` lines name tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct Glockfile;

impl Glockfile {
    /// Registered file name.
    pub const FILE_NAME: &'static str = "GLOCKFILE";
}

impl ManifestConverter for Glockfile {
    fn convert(&self, module_path: &str, data: &[u8]) -> Result<CanonicalFile, ModinvError> {
        let mut out = CanonicalFile::new(module_path);
        for (number, line) in numbered(decode(Self::FILE_NAME, data)?) {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields[0] == "cmd" {
                continue;
            }
            let [path, revision, ..] = fields[..] else {
                return Err(parse_error(Self::FILE_NAME, number, "expected import path and revision"));
            };
            require_line(&mut out, Self::FILE_NAME, number, path, revision)?;
        }
        Ok(out)
    }
}

/// godeps' `dependencies.tsv`: `path<TAB>vcs<TAB>revision[<TAB>...]` lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependenciesTsv;

impl DependenciesTsv {
    /// Registered file name.
    pub const FILE_NAME: &'static str = "dependencies.tsv";
}

impl ManifestConverter for DependenciesTsv {
    fn convert(&self, module_path: &str, data: &[u8]) -> Result<CanonicalFile, ModinvError> {
        let mut out = CanonicalFile::new(module_path);
        for (number, line) in numbered(decode(Self::FILE_NAME, data)?) {
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            let [path, _vcs, revision, ..] = fields[..] else {
                return Err(parse_error(
                    Self::FILE_NAME,
                    number,
                    format!("expected 3 tab-separated fields, found {}", fields.len()),
                ));
            };
            require_line(&mut out, Self::FILE_NAME, number, path, revision)?;
        }
        Ok(out)
    }
}

/// vndr's `vendor.conf`: `path revision [repository]` lines with `#` comments.
///
/// A repository that is not the import path itself becomes a replace
/// directive.
#[derive(Debug, Clone, Copy, Default)]
pub struct VendorConf;

impl VendorConf {
    /// Registered file name.
    pub const FILE_NAME: &'static str = "vendor.conf";
}

impl ManifestConverter for VendorConf {
    fn convert(&self, module_path: &str, data: &[u8]) -> Result<CanonicalFile, ModinvError> {
        let mut out = CanonicalFile::new(module_path);
        for (number, line) in numbered(decode(Self::FILE_NAME, data)?) {
            let content = line.split_once('#').map_or(line, |(before, _)| before);
            let fields: Vec<&str> = content.split_whitespace().collect();
            match fields[..] {
                [] => {}
                [path, revision] => require_line(&mut out, Self::FILE_NAME, number, path, revision)?,
                [path, revision, repository, ..] => {
                    require_line(&mut out, Self::FILE_NAME, number, path, revision)?;
                    let target = repository_path(repository);
                    if target != path {
                        out.add_replace(path, target, revision)
                            .map_err(|e| parse_error(Self::FILE_NAME, number, e.to_string()))?;
                    }
                }
                [_] => {
                    return Err(parse_error(Self::FILE_NAME, number, "expected import path and revision"));
                }
            }
        }
        Ok(out)
    }
}
