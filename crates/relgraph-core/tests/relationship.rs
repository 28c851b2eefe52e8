use relgraph_core::coordinate::{ArtifactRef, ProjectRef, ProjectVersionRef};
use relgraph_core::relationship::Relationship;
use relgraph_core::scope::DependencyScope;

fn pvr(s: &str) -> ProjectVersionRef {
    ProjectVersionRef::parse(s).unwrap()
}

#[test]
fn dependency_json_keeps_payload() {
    let rel = Relationship::dependency(
        pvr("org.a:a:1.0"),
        ArtifactRef::parse("org.b:b:2.0:jar:sources")
            .unwrap()
            .optional(true),
        DependencyScope::Runtime,
        3,
    )
    .managed(true);

    let json = serde_json::to_string(&rel).unwrap();
    assert!(json.contains("\"type\":\"dependency\""), "{json}");
    assert!(json.contains("\"declaring\":\"org.a:a:1.0\""), "{json}");

    let back: Relationship = serde_json::from_str(&json).unwrap();
    assert_eq!(back, rel);
    assert_eq!(back.scope(), Some(DependencyScope::Runtime));
    assert!(back.is_managed());
    assert!(back.is_optional());
    assert_eq!(back.index(), 3);
    assert_eq!(back.target_artifact().unwrap().classifier(), Some("sources"));
}

#[test]
fn plugin_dependency_json_keeps_plugin() {
    let rel = Relationship::plugin_dependency(
        pvr("org.a:a:1.0"),
        ProjectRef::new("org.p", "plugin"),
        pvr("org.q:helper:1"),
        0,
    );
    let json = serde_json::to_string(&rel).unwrap();
    let back: Relationship = serde_json::from_str(&json).unwrap();
    assert_eq!(back.kind(), rel.kind());
}

#[test]
fn display_shows_edge() {
    let rel = Relationship::parent(pvr("org.a:a:1.0"), pvr("org.a:parent:2"));
    assert_eq!(
        rel.to_string(),
        "org.a:a:1.0 -[parent#0]-> org.a:parent:2"
    );
}
