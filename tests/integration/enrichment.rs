use std::time::Duration;

use modinv_cli::buildlist::{BuildList, BuildListAccessor};
use modinv_cli::listing::{EnrichOptions, ListOptions, enrich, list_modules};
use modinv_cli::modinfo::ModulePublicInfo;
use modinv_cli::module::{ModuleVersion, ReplaceDirective};
use modinv_cli::query::IndexQueryService;
use modinv_cli::test_utils::InstrumentedQueryService;

const BOTH: EnrichOptions = EnrichOptions {
    update: true,
    versions: true,
};

fn many_modules(count: usize) -> (Vec<ModulePublicInfo>, IndexQueryService) {
    let mut modules = Vec::with_capacity(count);
    let mut index = IndexQueryService::new();
    for i in 0..count {
        let path = format!("example.com/dep{i}");
        modules.push(ModulePublicInfo::new(path.clone(), "v1.0.0"));
        index = index.with_module(path, ["v1.0.0", "v1.1.0"]);
    }
    (modules, index)
}

#[tokio::test]
async fn test_concurrency_never_exceeds_limit() {
    let (mut modules, index) = many_modules(12);
    let service = InstrumentedQueryService::new(index).with_delay(Duration::from_millis(20));

    enrich(&mut modules, &service, BOTH, 3).await;

    assert_eq!(service.max_in_flight(), 3);
    assert!(modules.iter().all(|m| m.update.is_some() && m.versions.is_some()));
}

#[tokio::test]
async fn test_order_is_preserved() {
    let (mut modules, index) = many_modules(8);
    let expected: Vec<String> = modules.iter().map(|m| m.path.clone()).collect();
    let service = InstrumentedQueryService::new(index).with_delay(Duration::from_millis(5));

    enrich(&mut modules, &service, BOTH, 4).await;

    let actual: Vec<String> = modules.iter().map(|m| m.path.clone()).collect();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_zero_limit_still_completes() {
    let (mut modules, index) = many_modules(3);
    let service = InstrumentedQueryService::new(index);

    enrich(&mut modules, &service, BOTH, 0).await;

    assert_eq!(service.max_in_flight(), 1);
    assert!(modules.iter().all(|m| m.versions.is_some()));
}

#[tokio::test]
async fn test_shared_replacement_target_queried_once() {
    let list = BuildList::new(
        ModuleVersion::new("example.com/app", ""),
        vec![ModuleVersion::new("a.com/x", "v1.0.0"), ModuleVersion::new("b.com/y", "v2.0.0")],
    )
    .unwrap()
    .with_replaces(vec![
        ReplaceDirective {
            old: ModuleVersion::new("a.com/x", ""),
            new: ModuleVersion::new("fork.com/z", "v1.0.0"),
        },
        ReplaceDirective {
            old: ModuleVersion::new("b.com/y", ""),
            new: ModuleVersion::new("fork.com/z", "v1.0.0"),
        },
    ]);
    let index = IndexQueryService::new()
        .with_module("a.com/x", ["v1.0.0"])
        .with_module("b.com/y", ["v2.0.0"])
        .with_module("fork.com/z", ["v1.0.0", "v1.3.0"]);
    let service = InstrumentedQueryService::new(index);
    let accessor = BuildListAccessor::new(list);

    let options = ListOptions {
        enrich: EnrichOptions {
            update: true,
            versions: false,
        },
        max_parallel: 4,
    };
    let resolution = list_modules(&["all".to_string()], &accessor, &service, options).await.unwrap();

    let fork_calls = service.calls().iter().filter(|c| c.contains("fork.com/z")).count();
    assert_eq!(fork_calls, 1);

    for path in ["a.com/x", "b.com/y"] {
        let info = resolution.modules.iter().find(|m| m.path == path).unwrap();
        let replace = info.replace.as_ref().unwrap();
        assert_eq!(replace.update.as_ref().unwrap().version, "v1.3.0");
        assert!(info.update.is_none());
    }
}

#[tokio::test]
async fn test_failure_is_isolated() {
    let (mut modules, index) = many_modules(4);
    let service = InstrumentedQueryService::new(index).failing("example.com/dep2");

    enrich(&mut modules, &service, BOTH, 2).await;

    for info in &modules {
        if info.path == "example.com/dep2" {
            assert!(info.update.is_none());
            assert!(info.versions.is_none());
            assert!(info.error.is_none());
        } else {
            assert_eq!(info.update.as_ref().unwrap().version, "v1.1.0");
            assert_eq!(info.versions.as_deref().unwrap(), ["v1.0.0", "v1.1.0"]);
        }
    }
}

#[tokio::test]
async fn test_failed_query_still_lists_known_versions() {
    let list = BuildList::new(ModuleVersion::new("example.com/app", ""), vec![]).unwrap();
    let index = IndexQueryService::new().with_module("foo", ["v1.1.0", "v1.0.0"]);
    let service = InstrumentedQueryService::new(index);
    let accessor = BuildListAccessor::new(list);
    let options = ListOptions {
        enrich: BOTH,
        max_parallel: 2,
    };

    let resolution =
        list_modules(&["foo@v9.9.9".to_string()], &accessor, &service, options).await.unwrap();

    let failed = &resolution.modules[0];
    assert_eq!(failed.version, "v9.9.9");
    assert!(failed.error.is_some());
    assert_eq!(failed.versions.as_deref().unwrap(), ["v1.0.0", "v1.1.0"]);
    assert!(failed.update.is_none());
    assert!(!service.calls().contains(&"query foo latest".to_string()));
}
