use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_migrate_glockfile() {
    let project = TestProject::new().unwrap();
    project
        .write_file("GLOCKFILE", "cmd github.com/tool/x\ngithub.com/a/b abc123\ngolang.org/x/text def456\n")
        .unwrap();

    project
        .modinv()
        .args(["migrate", "--module", "example.com/app"])
        .assert()
        .success()
        .stdout(
            "module example.com/app\n\
             \n\
             require (\n\
             \tgithub.com/a/b abc123\n\
             \tgolang.org/x/text def456\n\
             )\n",
        )
        .stderr(predicate::str::contains("GLOCKFILE (2 requirements)"));
}

#[test]
fn test_migrate_json_format() {
    let project = TestProject::new().unwrap();
    project.write_file("vendor.conf", "github.com/a/b v1.0.0 https://github.com/fork/b\n").unwrap();

    let output = project
        .modinv()
        .args(["migrate", "-m", "example.com/app", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let file: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(file["module"], "example.com/app");
    assert_eq!(file["requires"][0]["path"], "github.com/a/b");
    assert_eq!(file["replaces"].as_array().unwrap().len(), 1);
}

#[test]
fn test_migrate_without_manifests() {
    let project = TestProject::new().unwrap();

    project
        .modinv()
        .args(["migrate", "--module", "example.com/app"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No legacy manifests found"));
}

#[test]
fn test_migrate_fails_when_every_manifest_fails() {
    let project = TestProject::new().unwrap();
    project.write_file("GLOCKFILE", "lonely-field\n").unwrap();
    project.write_file("vendor/vendor.json", "").unwrap();

    project
        .modinv()
        .args(["migrate", "--module", "example.com/app"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("GLOCKFILE:1"));
}

#[test]
fn test_migrate_with_explicit_path() {
    let project = TestProject::new().unwrap();
    project.write_file("legacy/dependencies.tsv", "github.com/a/b\tgit\tabc123\n").unwrap();
    let dir = project.project_path().join("legacy");

    project
        .modinv()
        .arg("migrate")
        .arg("--path")
        .arg(&dir)
        .args(["--module", "example.com/app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\tgithub.com/a/b abc123\n"));
}

#[test]
fn test_migrate_reports_unreadable_manifest_and_continues() {
    let project = TestProject::new().unwrap();
    project.write_file("GLOCKFILE", "github.com/a/b abc123\n").unwrap();
    std::fs::create_dir_all(project.project_path().join("vendor/manifest")).unwrap();

    project
        .modinv()
        .args(["migrate", "--module", "example.com/app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\tgithub.com/a/b abc123\n"))
        .stderr(predicate::str::contains("vendor/manifest"));
}
