use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_list_without_arguments_prints_root() {
    let project = TestProject::with_sample().unwrap();

    project.modinv().arg("list").assert().success().stdout("example.com/app\n");
}

#[test]
fn test_list_all_with_updates() {
    let project = TestProject::with_sample().unwrap();

    project.modinv().args(["list", "-u", "all"]).assert().success().stdout(
        "example.com/app\n\
         github.com/a/b v1.0.0 [v1.1.0] => github.com/fork/b v1.0.1 [v1.0.2]\n\
         golang.org/x/text v0.3.0\n",
    );
}

#[test]
fn test_list_versions_of_pattern() {
    let project = TestProject::with_sample().unwrap();

    project
        .modinv()
        .args(["list", "--versions", "github.com/..."])
        .assert()
        .success()
        .stdout("github.com/a/b v1.0.0 v1.1.0\n");
}

#[test]
fn test_list_json_output() {
    let project = TestProject::with_sample().unwrap();

    let output = project.modinv().args(["list", "--json", "all"]).output().unwrap();
    assert!(output.status.success());

    let modules: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let modules = modules.as_array().unwrap();
    assert_eq!(modules.len(), 3);
    assert_eq!(modules[0]["path"], "example.com/app");
    assert_eq!(modules[0]["main"], true);
    assert_eq!(modules[1]["replace"]["path"], "github.com/fork/b");
    assert_eq!(modules[2]["indirect"], true);
    assert!(modules[1].get("update").is_none());
}

#[test]
fn test_relative_selector_is_fatal() {
    let project = TestProject::with_sample().unwrap();

    project
        .modinv()
        .args(["list", "github.com/a/b", "./foo"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cannot use relative path ./foo to specify module"));
}

#[test]
fn test_unmatched_selectors_warn_on_stderr() {
    let project = TestProject::with_sample().unwrap();

    project
        .modinv()
        .args(["list", "nobody.com/x", "cloud.google.com/...", "github.com/a/b"])
        .assert()
        .success()
        .stdout("github.com/a/b v1.0.0 => github.com/fork/b v1.0.1\n")
        .stderr(predicate::str::contains("module \"nobody.com/x\" is not a known dependency"))
        .stderr(predicate::str::contains(
            "pattern \"cloud.google.com/...\" matched no module dependencies",
        ));
}

#[test]
fn test_failed_query_prints_error_line() {
    let project = TestProject::with_sample().unwrap();

    project
        .modinv()
        .args(["list", "github.com/a/b@v7", "golang.org/x/text@latest"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("github.com/a/b: "))
        .stdout(predicate::str::contains("golang.org/x/text v0.3.0\n"));
}

#[test]
fn test_missing_snapshot_is_reported() {
    let project = TestProject::new().unwrap();

    project
        .modinv()
        .args(["list", "all"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("modinv.lock"));
}

#[test]
fn test_lockfile_setting_from_global_config() {
    let project = TestProject::new().unwrap();
    project
        .write_file(
            "state/build.lock",
            "[root]\npath = \"example.com/other\"\n\n[[module]]\npath = \"a.com/x\"\nversion = \"v0.1.0\"\n",
        )
        .unwrap();
    project.write_config("lockfile = \"state/build.lock\"\n").unwrap();

    project
        .modinv()
        .args(["list", "all"])
        .assert()
        .success()
        .stdout("example.com/other\na.com/x v0.1.0\n");
}

#[test]
fn test_failed_query_lists_known_versions() {
    let project = TestProject::with_sample().unwrap();

    project
        .modinv()
        .args(["list", "--versions", "github.com/a/b@v9.9.9"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("github.com/a/b v1.0.0 v1.1.0: "))
        .stdout(predicate::str::contains("no matching versions"));
}

#[test]
fn test_malformed_index_does_not_mask_selector_errors() {
    let project = TestProject::with_sample().unwrap();
    project.write_file("versions.toml", "modules = [oops").unwrap();

    project
        .modinv()
        .args(["list", "./foo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot use relative path ./foo"));

    project.modinv().arg("list").assert().success().stdout("example.com/app\n");

    project.modinv().args(["list", "-u", "all"]).assert().failure();
}
