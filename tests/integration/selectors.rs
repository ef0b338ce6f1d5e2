use modinv_cli::buildlist::{BuildList, BuildListAccessor};
use modinv_cli::core::ModinvError;
use modinv_cli::listing::resolve;
use modinv_cli::module::ModuleVersion;
use modinv_cli::query::IndexQueryService;
use modinv_cli::test_utils::{CountingLoader, InstrumentedQueryService, init_test_logging};

fn build_list(root_exists: bool) -> BuildList {
    BuildList::new(
        ModuleVersion::new("example.com/app", ""),
        vec![
            ModuleVersion::new("foo", "v1.0.0"),
            ModuleVersion::new("fizz.com/buzz", "v0.2.0"),
            ModuleVersion::new("golang.org/x/text", "v0.3.0"),
        ],
    )
    .unwrap()
    .with_root_exists(root_exists)
}

fn index() -> IndexQueryService {
    IndexQueryService::new()
        .with_module("foo", ["v1.0.0", "v1.1.0"])
        .with_module("unknown-pkg", ["v0.1.0", "v0.2.0"])
}

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[tokio::test]
async fn test_overlapping_selectors_emit_each_entry_once() {
    init_test_logging(None);
    let accessor = BuildListAccessor::new(build_list(true));

    let resolution =
        resolve(&args(&["foo", "foo", "f...", "all"]), &accessor, &index(), false).await.unwrap();
    let paths: Vec<&str> = resolution.modules.iter().map(|m| m.path.as_str()).collect();

    assert_eq!(paths, vec!["foo", "fizz.com/buzz", "example.com/app", "golang.org/x/text"]);
    assert_eq!(paths.iter().filter(|p| **p == "foo").count(), 1);
    assert!(resolution.warnings.is_empty());
}

#[tokio::test]
async fn test_resolution_is_idempotent() {
    let accessor = BuildListAccessor::new(CountingLoader::new(build_list(true)));
    let service = index();
    let selectors = args(&["golang.org/...", "foo@latest", "all", "missing"]);

    let first = resolve(&selectors, &accessor, &service, false).await.unwrap();
    let second = resolve(&selectors, &accessor, &service, false).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(accessor.loader().loads(), 1);
}

#[tokio::test]
async fn test_root_hidden_from_wildcards_when_missing() {
    let accessor = BuildListAccessor::new(build_list(false));

    let resolution = resolve(&args(&["all", "example.com/..."]), &accessor, &index(), false)
        .await
        .unwrap();

    assert!(resolution.modules.iter().all(|m| m.path != "example.com/app"));
    assert_eq!(resolution.modules.len(), 3);
    assert_eq!(resolution.warnings, vec!["pattern \"example.com/...\" matched no module dependencies"]);
}

#[tokio::test]
async fn test_no_arguments_yield_only_root() {
    for root_exists in [true, false] {
        let accessor = BuildListAccessor::new(build_list(root_exists));
        let resolution = resolve(&[], &accessor, &index(), true).await.unwrap();

        assert_eq!(resolution.modules.len(), 1);
        assert_eq!(resolution.modules[0].path, "example.com/app");
        assert!(resolution.modules[0].main);
    }
}

#[tokio::test]
async fn test_failed_version_query_is_contained() {
    let accessor = BuildListAccessor::new(build_list(true));

    let resolution =
        resolve(&args(&["foo@badversion", "fizz.com/buzz"]), &accessor, &index(), false)
            .await
            .unwrap();

    assert_eq!(resolution.modules.len(), 2);
    let failed = &resolution.modules[0];
    assert_eq!(failed.path, "foo");
    assert_eq!(failed.version, "badversion");
    assert!(failed.error.is_some());
    assert_eq!(resolution.modules[1].path, "fizz.com/buzz");
}

#[tokio::test]
async fn test_version_query_outside_build_list() {
    let accessor = BuildListAccessor::new(build_list(true));

    let resolution =
        resolve(&args(&["unknown-pkg@v0.1"]), &accessor, &index(), false).await.unwrap();

    assert_eq!(resolution.modules[0].version, "v0.1.0");
    assert!(resolution.modules[0].error.is_none());
}

#[tokio::test]
async fn test_unmatched_literal_fallback() {
    let accessor = BuildListAccessor::new(build_list(true));
    let service = InstrumentedQueryService::new(index());

    let with_versions = resolve(&args(&["unknown-pkg"]), &accessor, &service, true).await.unwrap();
    assert_eq!(with_versions.modules.len(), 1);
    assert_eq!(with_versions.modules[0].version, "v0.2.0");
    assert!(with_versions.modules[0].error.is_none());
    assert!(with_versions.warnings.is_empty());

    let without = resolve(&args(&["unknown-pkg"]), &accessor, &service, false).await.unwrap();
    assert!(without.modules.is_empty());
    assert_eq!(without.warnings.len(), 1);

    assert_eq!(service.calls(), vec!["query unknown-pkg latest"]);
}

#[tokio::test]
async fn test_fatal_selector_precedes_loading() {
    for bad in ["./foo", "..", "foo\\bar", "@v1.0.0"] {
        let accessor = BuildListAccessor::new(CountingLoader::new(build_list(true)));
        let result = resolve(&args(&["foo", bad]), &accessor, &index(), true).await;

        assert!(result.is_err(), "{bad} should abort");
        assert_eq!(accessor.loader().loads(), 0);
    }

    let accessor = BuildListAccessor::new(build_list(true));
    let err = resolve(&args(&["../x"]), &accessor, &index(), false).await.unwrap_err();
    assert_eq!(err.to_string(), "cannot use relative path ../x to specify module");
    assert!(matches!(err, ModinvError::RelativePathSelector { .. }));
}
