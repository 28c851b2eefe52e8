use std::fs;
use std::path::{Path, PathBuf};

use relgraph_core::config::{GlobalConfig, StoreBackend, StoreConfig};
use relgraph_ops::ops_tree::TreeOptions;
use relgraph_ops::{
    ops_ancestry, ops_cycles, ops_dependents, ops_import, ops_order, ops_tree, ops_workspace,
    parse_project, parse_projects, FilterOptions, GraphSource,
};
use relgraph_traverse::CancellationToken;
use tempfile::TempDir;

const GRAPH: &str = r#"
[[relationship]]
declaring = "org.demo:app:1.0"
type = "parent"
target = "org.demo:parent:1.0"

[[relationship]]
declaring = "org.demo:parent:1.0"
type = "parent"
target = "org.demo:parent:1.0"

[[relationship]]
declaring = "org.demo:app:1.0"
type = "dependency"
target = "org.demo:lib:1.0"
scope = "compile"

[[relationship]]
declaring = "org.demo:app:1.0"
type = "dependency"
target = "junit:junit:4.13"
scope = "test"

[[relationship]]
declaring = "org.demo:lib:1.0"
type = "dependency"
target = "org.demo:util:1.0"
"#;

fn sqlite_config(tmp: &Path) -> GlobalConfig {
    GlobalConfig {
        store: StoreConfig {
            backend: StoreBackend::Sqlite,
            dir: Some(tmp.join("workspaces")),
        },
        ..GlobalConfig::default()
    }
}

fn write_graph(tmp: &Path) -> PathBuf {
    let path = tmp.join("graph.toml");
    fs::write(&path, GRAPH).unwrap();
    path
}

fn projects(args: &[&str]) -> Vec<relgraph_core::coordinate::ProjectVersionRef> {
    let owned: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    parse_projects(&owned).unwrap()
}

#[test]
fn import_then_order_from_workspace() {
    let tmp = TempDir::new().unwrap();
    let config = sqlite_config(tmp.path());
    let file = write_graph(tmp.path());

    let summary = ops_import::import(&config, &file, "demo").unwrap();
    assert_eq!(summary.read, 5);
    assert_eq!(summary.added, 5);
    let again = ops_import::import(&config, &file, "demo").unwrap();
    assert_eq!(again.added, 0);

    let result = ops_order::order(
        &config,
        &GraphSource::Workspace("demo".into()),
        &projects(&["org.demo:app:1.0"]),
        &FilterOptions {
            scope: Some("runtime".into()),
            ..FilterOptions::default()
        },
        &CancellationToken::new(),
    )
    .unwrap();
    assert!(result.is_complete());
    let order: Vec<String> = result
        .value()
        .order()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        order,
        vec!["org.demo:parent", "org.demo:util", "org.demo:lib", "org.demo:app"]
    );
    assert_eq!(result.value().cycles().len(), 1);

    assert_eq!(ops_workspace::list(&config).unwrap(), vec!["demo".to_string()]);
    assert!(ops_workspace::delete(&config, "demo").unwrap());
    assert!(ops_workspace::list(&config).unwrap().is_empty());
}

#[test]
fn order_straight_from_a_file() {
    let tmp = TempDir::new().unwrap();
    let config = sqlite_config(tmp.path());
    let source = GraphSource::File(write_graph(tmp.path()));

    let result = ops_order::order(
        &config,
        &source,
        &projects(&["org.demo:app:1.0"]),
        &FilterOptions {
            types: Some(vec!["dependency".into()]),
            ..FilterOptions::default()
        },
        &CancellationToken::new(),
    )
    .unwrap();
    assert_eq!(result.value().order().len(), 4);
    assert!(result.value().cycles().is_empty());
    assert!(!tmp.path().join("workspaces").exists());
}

#[test]
fn unknown_type_or_scope_is_an_error() {
    let config = GlobalConfig::default();
    let bad_type = FilterOptions {
        types: Some(vec!["sibling".into()]),
        ..FilterOptions::default()
    };
    let err = bad_type.filter(&config).unwrap_err();
    assert!(err.to_string().contains("Unknown relationship type 'sibling'"));

    let bad_scope = FilterOptions {
        scope: Some("everything".into()),
        ..FilterOptions::default()
    };
    assert!(bad_scope.filter(&config).is_err());
}

#[test]
fn cycles_tree_ancestry_and_dependents() {
    let tmp = TempDir::new().unwrap();
    let config = sqlite_config(tmp.path());
    let source = GraphSource::File(write_graph(tmp.path()));
    let app = parse_project("org.demo:app:1.0").unwrap();

    let cycles = ops_cycles::cycles(
        &config,
        &source,
        std::slice::from_ref(&app),
        &FilterOptions::default(),
        &CancellationToken::new(),
    )
    .unwrap();
    assert_eq!(cycles.value().len(), 1);

    let tree = ops_tree::tree(&config, &source, &app, &TreeOptions::default()).unwrap();
    assert!(tree.starts_with("org.demo:app:1.0\n"));
    assert!(tree.contains("+- org.demo:parent:1.0 [parent]"));
    assert!(tree.contains("junit:junit:4.13:jar [test]"));

    let chain = ops_ancestry::ancestry(&config, &source, &app).unwrap();
    assert_eq!(chain.len(), 2);

    let util = parse_project("org.demo:util:1.0").unwrap();
    let deps = ops_dependents::dependents(&config, &source, &util, &FilterOptions::default())
        .unwrap();
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].declaring().to_string(), "org.demo:lib:1.0");
}

#[test]
fn malformed_project_argument() {
    assert!(parse_project("org.demo:app").is_err());
    assert!(parse_project("org.demo::1.0").is_err());
}

const CHORD: &str = r#"
[[relationship]]
declaring = "g:a:1"
type = "dependency"
target = "g:b:1"

[[relationship]]
declaring = "g:a:1"
type = "dependency"
target = "g:c:1"

[[relationship]]
declaring = "g:b:1"
type = "dependency"
target = "g:c:1"

[[relationship]]
declaring = "g:c:1"
type = "dependency"
target = "g:a:1"
"#;

#[test]
fn cycles_lists_every_cycle_through_shared_projects() {
    let tmp = TempDir::new().unwrap();
    let config = sqlite_config(tmp.path());
    let path = tmp.path().join("chord.toml");
    fs::write(&path, CHORD).unwrap();
    let source = GraphSource::File(path);
    let roots = projects(&["g:a:1"]);

    let found = ops_cycles::cycles(
        &config,
        &source,
        &roots,
        &FilterOptions::default(),
        &CancellationToken::new(),
    )
    .unwrap();
    assert!(found.is_complete());
    let shown: Vec<String> = found.value().iter().map(ToString::to_string).collect();
    assert_eq!(shown, vec!["g:a -> g:b -> g:c -> g:a", "g:c -> g:a -> g:c"]);

    let cancelled = CancellationToken::new();
    cancelled.cancel();
    let partial =
        ops_cycles::cycles(&config, &source, &roots, &FilterOptions::default(), &cancelled)
            .unwrap();
    assert!(!partial.is_complete());
    assert!(partial.value().is_empty());
}
