//! Selector resolution against the build list.

use tracing::{debug, warn};

use super::Selector;
use crate::buildlist::{BuildList, BuildListAccessor, BuildListLoader};
use crate::constants::LATEST_QUERY;
use crate::core::ModinvError;
use crate::modinfo::{ModuleInfoAssembler, ModulePublicInfo};
use crate::module::ModuleVersion;
use crate::query::QueryService;

/// Descriptors selected by an argument list, plus non-fatal warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Descriptors in argument order, build list order within an argument
    pub modules: Vec<ModulePublicInfo>,
    /// Messages about selectors that matched nothing
    pub warnings: Vec<String>,
}

/// Resolves `args` to module descriptors.
///
/// Every argument is validated before the build list is loaded, so a fatal
/// selector error leaves nothing half done. With no arguments the result is
/// the root module alone.
///
/// A build list entry matched by several selectors is emitted once, at its
/// first match. `want_versions` enables the `latest` lookup for literal
/// selectors that match no build list entry.
///
/// # Errors
///
/// Fails on invalid selectors (see [`Selector::parse`]) and when the build
/// list cannot be loaded. Per-item failures are reported on the descriptors.
pub async fn resolve<L, Q>(
    args: &[String],
    build_list: &BuildListAccessor<L>,
    query: &Q,
    want_versions: bool,
) -> Result<Resolution, ModinvError>
where
    L: BuildListLoader,
    Q: QueryService,
{
    let selectors = args.iter().map(|arg| Selector::parse(arg)).collect::<Result<Vec<_>, _>>()?;

    let list = build_list.ensure_loaded().await?;
    let assembler = ModuleInfoAssembler::new(list);

    if selectors.is_empty() {
        return Ok(Resolution {
            modules: vec![assembler.assemble(list.root(), true)],
            warnings: Vec::new(),
        });
    }

    let mut resolution = Resolution::default();
    let mut consumed = vec![false; list.len()];

    for selector in &selectors {
        if let Selector::VersionQuery {
            path,
            constraint,
        } = selector
        {
            let info = match query.query(path, constraint).await {
                Ok(found) => {
                    assembler.assemble(&ModuleVersion::new(path.clone(), found.version), false)
                }
                Err(e) => {
                    debug!("Query '{}' failed: {}", selector, e);
                    ModulePublicInfo::with_error(path.clone(), constraint.clone(), e)
                }
            };
            resolution.modules.push(info);
            continue;
        }

        let matched = scan(selector, list, &mut consumed, &assembler, &mut resolution.modules);
        if matched {
            continue;
        }

        match selector {
            Selector::Literal(path) if want_versions => {
                resolution.modules.push(lookup_unknown(path, query, &assembler).await);
            }
            Selector::Literal(path) => {
                resolution.warn(format!("module \"{path}\" is not a known dependency"));
            }
            _ => {
                resolution.warn(format!("pattern \"{selector}\" matched no module dependencies"));
            }
        }
    }

    Ok(resolution)
}

/// Emits every unconsumed entry matching `selector`; returns whether anything matched.
fn scan(
    selector: &Selector,
    list: &BuildList,
    consumed: &mut [bool],
    assembler: &ModuleInfoAssembler<'_>,
    out: &mut Vec<ModulePublicInfo>,
) -> bool {
    let mut matched = false;
    for entry in list.entries() {
        if entry.is_root() && !list.root_exists() {
            continue;
        }
        if !selector.matches(&entry.module.path) {
            continue;
        }
        matched = true;
        if !consumed[entry.index] {
            consumed[entry.index] = true;
            out.push(assembler.assemble(entry.module, true));
        }
    }
    matched
}

/// Provisional lookup for a literal that is not in the build list.
async fn lookup_unknown<Q: QueryService>(
    path: &str,
    query: &Q,
    assembler: &ModuleInfoAssembler<'_>,
) -> ModulePublicInfo {
    match query.query(path, LATEST_QUERY).await {
        Ok(found) => assembler.assemble(&ModuleVersion::new(path, found.version), false),
        Err(e) => {
            debug!("Provisional lookup of '{}' failed: {}", path, e);
            ModulePublicInfo::with_error(
                path,
                "",
                format!("module \"{path}\" is not a known dependency"),
            )
        }
    }
}

impl Resolution {
    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::IndexQueryService;

    fn list(root_exists: bool) -> BuildList {
        BuildList::new(
            ModuleVersion::new("example.com/app", ""),
            vec![
                ModuleVersion::new("foo", "v1.0.0"),
                ModuleVersion::new("golang.org/x/text", "v0.3.0"),
                ModuleVersion::new("golang.org/x/net", "v0.1.0"),
            ],
        )
        .unwrap()
        .with_root_exists(root_exists)
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn paths(resolution: &Resolution) -> Vec<&str> {
        resolution.modules.iter().map(|m| m.path.as_str()).collect()
    }

    fn service() -> IndexQueryService {
        IndexQueryService::new()
            .with_module("foo", ["v1.0.0", "v1.1.0"])
            .with_module("unknown-pkg", ["v0.4.0"])
    }

    #[tokio::test]
    async fn test_no_args_yields_root() {
        let accessor = BuildListAccessor::new(list(false));
        let resolution = resolve(&[], &accessor, &service(), false).await.unwrap();

        assert_eq!(paths(&resolution), vec!["example.com/app"]);
        assert!(resolution.modules[0].main);
    }

    #[tokio::test]
    async fn test_wildcard_order_and_root_visibility() {
        let accessor = BuildListAccessor::new(list(false));
        let resolution =
            resolve(&args(&["golang.org/x/...", "all"]), &accessor, &service(), false).await.unwrap();

        assert_eq!(paths(&resolution), vec!["golang.org/x/text", "golang.org/x/net", "foo"]);
        assert!(resolution.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_root_literal_requires_existing_root() {
        let hidden = BuildListAccessor::new(list(false));
        let resolution = resolve(&args(&["example.com/app"]), &hidden, &service(), false).await.unwrap();
        assert!(resolution.modules.is_empty());
        assert_eq!(resolution.warnings.len(), 1);

        let visible = BuildListAccessor::new(list(true));
        let resolution = resolve(&args(&["example.com/app"]), &visible, &service(), false).await.unwrap();
        assert_eq!(paths(&resolution), vec!["example.com/app"]);
    }

    #[tokio::test]
    async fn test_version_query_resolution() {
        let accessor = BuildListAccessor::new(list(true));
        let resolution =
            resolve(&args(&["foo@latest", "foo@v9"]), &accessor, &service(), false).await.unwrap();

        assert_eq!(resolution.modules[0].version, "v1.1.0");
        assert!(resolution.modules[0].error.is_none());
        assert_eq!(resolution.modules[1].version, "v9");
        assert!(resolution.modules[1].error.is_some());
    }

    #[tokio::test]
    async fn test_empty_constraint_is_item_error() {
        let accessor = BuildListAccessor::new(list(true));
        let resolution = resolve(&args(&["foo@"]), &accessor, &service(), false).await.unwrap();

        assert_eq!(resolution.modules.len(), 1);
        assert!(resolution.modules[0].is_error());
    }

    #[tokio::test]
    async fn test_unmatched_literal_without_versions_warns() {
        let accessor = BuildListAccessor::new(list(true));
        let resolution = resolve(&args(&["unknown-pkg"]), &accessor, &service(), false).await.unwrap();

        assert!(resolution.modules.is_empty());
        assert_eq!(resolution.warnings, vec!["module \"unknown-pkg\" is not a known dependency"]);
    }

    #[tokio::test]
    async fn test_unmatched_literal_lookup_failure_is_item_error() {
        let accessor = BuildListAccessor::new(list(true));
        let resolution = resolve(&args(&["nobody.com/x"]), &accessor, &service(), true).await.unwrap();

        assert_eq!(resolution.modules.len(), 1);
        assert_eq!(
            resolution.modules[0].error.as_ref().unwrap().err,
            "module \"nobody.com/x\" is not a known dependency"
        );
    }

    #[tokio::test]
    async fn test_fatal_selector_aborts_everything() {
        let accessor = BuildListAccessor::new(list(true));
        let result = resolve(&args(&["foo", "../bar"]), &accessor, &service(), false).await;

        assert!(matches!(result, Err(ModinvError::RelativePathSelector { .. })));
        assert!(accessor.get().is_none());
    }
}
