//! Parent-chain collection.

use relgraph_core::coordinate::ProjectVersionRef;
use relgraph_core::relationship::Relationship;
use relgraph_store::RelationshipGraphStore;
use relgraph_util::errors::GraphResult;

use crate::filter::RelationshipFilter;
use crate::traversal::{Traversal, TraversalVisitor};

/// Follows PARENT edges, recording each project once, starting at the root.
#[derive(Debug, Default)]
pub struct AncestryVisitor {
    chain: Vec<ProjectVersionRef>,
}

impl AncestryVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_chain(self) -> Vec<ProjectVersionRef> {
        self.chain
    }
}

impl TraversalVisitor for AncestryVisitor {
    fn enter_root(&mut self, root: &ProjectVersionRef) -> bool {
        self.chain.push(root.clone());
        true
    }

    fn visit(&mut self, rel: &Relationship, _depth: usize, _path: &[Relationship]) -> bool {
        // A terminal parent points at itself; a cycle points back into the chain.
        if self.chain.contains(rel.target()) {
            return false;
        }
        self.chain.push(rel.target().clone());
        true
    }
}

/// The project followed by its parent, grandparent and so on.
pub fn ancestry(
    store: &dyn RelationshipGraphStore,
    project: &ProjectVersionRef,
) -> GraphResult<Vec<ProjectVersionRef>> {
    let mut visitor = AncestryVisitor::new();
    Traversal::new(store, RelationshipFilter::parents_only())
        .run(std::slice::from_ref(project), &mut visitor)?;
    Ok(visitor.into_chain())
}
