use anyhow::{Context, Result};

use crate::modinfo::ModulePublicInfo;

/// Renders descriptors one per line.
///
/// A descriptor prints as `path version [update]`, followed by
/// ` => target version [update]` when replaced. In versions mode it prints as
/// `path v1 v2 ...`. Error descriptors print as `path: message`, with the
/// known versions between path and message in versions mode.
#[must_use]
pub fn format_text(modules: &[ModulePublicInfo], versions: bool) -> String {
    let mut out = String::new();
    for info in modules {
        out.push_str(&format_line(info, versions));
        out.push('\n');
    }
    out
}

fn format_line(info: &ModulePublicInfo, versions: bool) -> String {
    let head = if versions {
        let mut head = info.path.clone();
        for version in info.versions.iter().flatten() {
            head.push(' ');
            head.push_str(version);
        }
        head
    } else {
        info.path.clone()
    };

    if let Some(error) = &info.error {
        return format!("{head}: {error}");
    }
    if versions {
        return head;
    }

    let mut line = describe(info);
    if let Some(target) = info.replace.as_deref() {
        line.push_str(" => ");
        line.push_str(&describe(target));
    }
    line
}

/// `path version [update]` with absent parts left out.
fn describe(info: &ModulePublicInfo) -> String {
    let mut text = info.path.clone();
    if !info.version.is_empty() {
        text.push(' ');
        text.push_str(&info.version);
    }
    if let Some(update) = info.update.as_deref() {
        text.push_str(&format!(" [{}]", update.version));
    }
    text
}

/// Renders descriptors as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn format_json(modules: &[ModulePublicInfo]) -> Result<String> {
    serde_json::to_string_pretty(modules).context("Failed to serialize module list")
}
