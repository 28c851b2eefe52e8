//! Reverse lookups.

use std::collections::BTreeSet;

use relgraph_core::coordinate::ProjectVersionRef;
use relgraph_core::relationship::Relationship;
use relgraph_store::RelationshipGraphStore;
use relgraph_util::errors::GraphResult;

use crate::filter::RelationshipFilter;

/// Accepted edges that point at `project`, in store order.
///
/// Every edge is judged as a root edge (depth 1).
pub fn dependents(
    store: &dyn RelationshipGraphStore,
    project: &ProjectVersionRef,
    filter: &RelationshipFilter,
) -> GraphResult<Vec<Relationship>> {
    Ok(store
        .relationships_targeting(project)?
        .into_iter()
        .filter(|rel| filter.accepts(rel, 1))
        .collect())
}

/// Distinct declaring projects of [`dependents`].
pub fn dependent_projects(
    store: &dyn RelationshipGraphStore,
    project: &ProjectVersionRef,
    filter: &RelationshipFilter,
) -> GraphResult<BTreeSet<ProjectVersionRef>> {
    Ok(dependents(store, project, filter)?
        .into_iter()
        .map(|rel| rel.declaring().clone())
        .collect())
}
