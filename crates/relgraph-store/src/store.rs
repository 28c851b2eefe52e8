//! The storage contract every backend satisfies.

use std::collections::BTreeSet;
use std::sync::Arc;

use relgraph_core::coordinate::{ProjectRef, ProjectVersionRef};
use relgraph_core::relationship::Relationship;
use relgraph_util::errors::{GraphError, GraphResult};

/// Edge storage for one workspace.
///
/// # Guarantees
///
/// Every implementation must provide:
/// - read-after-write visibility through the same handle
/// - per-edge atomic writes (no edge is observed half-written)
/// - reads that never wait on other reads
///
/// Sets are returned in [`Relationship`] order (declaring, type, index,
/// target) so repeated traversals over an unmodified store are identical.
///
/// # Errors
///
/// Any method may fail with [`GraphError::Connection`] when the backend is
/// unreachable or corrupted. Adds fail with [`GraphError::InvalidRelationship`]
/// for malformed edges, which are never stored.
pub trait RelationshipGraphStore: Send + Sync {
    /// Store a relationship. Returns `true` only if it was not already present.
    fn add_relationship(&self, rel: Relationship) -> GraphResult<bool>;

    /// Store many relationships, returning how many were new.
    ///
    /// Validation happens before anything is written.
    fn add_relationships(&self, rels: Vec<Relationship>) -> GraphResult<usize> {
        for rel in &rels {
            rel.validate()?;
        }
        let mut added = 0;
        for rel in rels {
            if self.add_relationship(rel)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Outbound edges of a project.
    fn relationships_declared_by(
        &self,
        project: &ProjectVersionRef,
    ) -> GraphResult<BTreeSet<Relationship>>;

    /// Inbound edges of a project.
    fn relationships_targeting(
        &self,
        project: &ProjectVersionRef,
    ) -> GraphResult<BTreeSet<Relationship>>;

    fn all_relationships(&self) -> GraphResult<BTreeSet<Relationship>>;

    /// Whether the project declares or is targeted by any stored edge.
    fn contains_project(&self, project: &ProjectVersionRef) -> GraphResult<bool>;

    fn contains_relationship(&self, rel: &Relationship) -> GraphResult<bool>;

    /// Every versioned project appearing as a declaring or target endpoint.
    fn all_project_versions(&self) -> GraphResult<BTreeSet<ProjectVersionRef>>;

    /// Every unversioned project identity in the workspace.
    fn all_projects(&self) -> GraphResult<BTreeSet<ProjectRef>> {
        Ok(self
            .all_project_versions()?
            .into_iter()
            .map(|p| p.project_ref().clone())
            .collect())
    }
}

/// Opens and releases isolated workspaces by key.
pub trait GraphDriver: Send + Sync {
    /// Open (creating if needed) the workspace named `key`.
    ///
    /// Opening the same key twice returns handles onto the same graph.
    fn open_workspace(&self, key: &str) -> GraphResult<Arc<dyn RelationshipGraphStore>>;

    /// Keys of every existing workspace, sorted.
    fn workspace_keys(&self) -> GraphResult<Vec<String>>;

    /// Destroy a workspace. Returns `false` if it did not exist.
    fn delete_workspace(&self, key: &str) -> GraphResult<bool>;
}

/// Workspace keys are non-empty and limited to `[A-Za-z0-9._-]`, and may not
/// start with a dot.
pub fn validate_workspace_key(key: &str) -> GraphResult<()> {
    let fail = |message: String| GraphError::InvalidWorkspace {
        key: key.to_string(),
        message,
    };
    if key.is_empty() {
        return Err(fail("key is empty".to_string()));
    }
    if key.starts_with('.') {
        return Err(fail("key may not start with '.'".to_string()));
    }
    if let Some(bad) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(fail(format!("illegal character '{bad}'")));
    }
    Ok(())
}
