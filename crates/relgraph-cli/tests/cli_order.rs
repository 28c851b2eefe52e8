use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CYCLIC: &str = r#"
[[relationship]]
declaring = "g:a:1"
type = "dependency"
target = "g:b:1"

[[relationship]]
declaring = "g:b:1"
type = "dependency"
target = "g:c:1"

[[relationship]]
declaring = "g:c:1"
type = "dependency"
target = "g:a:1"
"#;

const LAYERED: &str = r#"
[[relationship]]
declaring = "g:app:1"
type = "dependency"
target = "g:lib:1"

[[relationship]]
declaring = "g:app:1"
type = "dependency"
target = "g:junit:4"
scope = "test"

[[relationship]]
declaring = "g:lib:1"
type = "parent"
target = "g:parent:1"
"#;

fn relgraph_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("relgraph").unwrap();
    cmd.env("RELGRAPH_HOME", home).env_remove("RUST_LOG");
    cmd
}

fn write(tmp: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = tmp.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_order_from_graph_file() {
    let tmp = TempDir::new().unwrap();
    let graph = write(&tmp, "graph.toml", LAYERED);

    relgraph_cmd(tmp.path())
        .args(["order", "g:app:1", "--graph"])
        .arg(&graph)
        .assert()
        .success()
        .stdout(predicate::str::contains("1. g:parent"))
        .stdout(predicate::str::contains("2. g:lib"))
        .stdout(predicate::str::contains("3. g:junit"))
        .stdout(predicate::str::contains("4. g:app"));
}

#[test]
fn test_order_scope_filter() {
    let tmp = TempDir::new().unwrap();
    let graph = write(&tmp, "graph.toml", LAYERED);

    relgraph_cmd(tmp.path())
        .args(["order", "g:app:1", "--scope", "runtime", "--graph"])
        .arg(&graph)
        .assert()
        .success()
        .stdout(predicate::str::contains("g:junit").not());
}

#[test]
fn test_order_reports_cycle_without_failing() {
    let tmp = TempDir::new().unwrap();
    let graph = write(&tmp, "cyclic.toml", CYCLIC);

    relgraph_cmd(tmp.path())
        .args(["order", "g:a:1", "--graph"])
        .arg(&graph)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cycles (1):"))
        .stdout(predicate::str::contains("g:a -> g:b -> g:c -> g:a"))
        .stderr(predicate::str::contains("cycle in build order"));
}

#[test]
fn test_order_json() {
    let tmp = TempDir::new().unwrap();
    let graph = write(&tmp, "cyclic.toml", CYCLIC);

    let output = relgraph_cmd(tmp.path())
        .args(["order", "g:a:1", "--json", "--graph"])
        .arg(&graph)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["complete"], serde_json::json!(true));
    assert_eq!(value["order"], serde_json::json!(["g:c", "g:b", "g:a"]));
    assert_eq!(
        value["cycles"][0]["projects"],
        serde_json::json!(["g:a", "g:b", "g:c"])
    );
}

#[test]
fn test_order_requires_a_source() {
    let tmp = TempDir::new().unwrap();

    relgraph_cmd(tmp.path())
        .args(["order", "g:a:1"])
        .assert()
        .failure();
}

#[test]
fn test_order_rejects_bad_coordinate() {
    let tmp = TempDir::new().unwrap();
    let graph = write(&tmp, "graph.toml", LAYERED);

    relgraph_cmd(tmp.path())
        .args(["order", "g:app", "--graph"])
        .arg(&graph)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected group:artifact:version"));
}

#[test]
fn test_cycles_and_tree() {
    let tmp = TempDir::new().unwrap();
    let graph = write(&tmp, "cyclic.toml", CYCLIC);

    relgraph_cmd(tmp.path())
        .args(["cycles", "g:b:1", "--graph"])
        .arg(&graph)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cycles (1):"));

    relgraph_cmd(tmp.path())
        .args(["tree", "g:a:1", "--graph"])
        .arg(&graph)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("g:a:1\n"))
        .stdout(predicate::str::contains("g:a:1:jar [compile] (cycle)"));
}
