use relgraph_util::errors::GraphError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = GraphError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_connection_error_display_without_context() {
    let err = GraphError::connection("database locked");
    assert_eq!(
        err.to_string(),
        "Graph store connection failed: database locked"
    );
    assert!(err.is_connection());
}

#[test]
fn test_connection_error_with_traversal_context() {
    let err = GraphError::connection("disk gone")
        .with_traversal_context("org.a:a:1.0", Some("org.a:a:1.0 -> org.b:b:1.0"));
    assert_eq!(
        err.to_string(),
        "Graph store connection failed: disk gone (root org.a:a:1.0, edge org.a:a:1.0 -> org.b:b:1.0)"
    );
}

#[test]
fn test_traversal_context_keeps_existing_context() {
    let err = GraphError::connection("x").with_traversal_context("first", None);
    let err = err.with_traversal_context("second", Some("edge"));
    assert_eq!(
        err.to_string(),
        "Graph store connection failed: x (root first)"
    );
}

#[test]
fn test_traversal_context_ignores_other_variants() {
    let err = GraphError::InvalidRelationship {
        message: "empty group".to_string(),
    }
    .with_traversal_context("root", None);
    assert_eq!(err.to_string(), "Invalid relationship: empty group");
    assert!(!err.is_connection());
}

#[test]
fn test_invalid_workspace_display() {
    let err = GraphError::InvalidWorkspace {
        key: "a/b".to_string(),
        message: "illegal character '/'".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Invalid workspace 'a/b': illegal character '/'"
    );
}

#[test]
fn test_config_error_display() {
    let err = GraphError::Config {
        message: "bad scope".to_string(),
    };
    assert_eq!(err.to_string(), "Config error: bad scope");
}

#[test]
fn test_generic_error_display() {
    let err = GraphError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}
