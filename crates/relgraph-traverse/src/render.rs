//! Text rendering of edges and traversal trees.

use std::collections::HashSet;

use relgraph_core::coordinate::ProjectVersionRef;
use relgraph_core::relationship::{Relationship, RelationshipKind};

use crate::traversal::TraversalVisitor;

/// One-line description of an edge's target side.
pub fn render_edge(rel: &Relationship) -> String {
    let mut out = match rel.kind() {
        RelationshipKind::Parent { target } => format!("{target} [parent]"),
        RelationshipKind::Dependency { target, scope, .. } => format!("{target} [{scope}]"),
        RelationshipKind::Plugin {
            target, reporting, ..
        } => {
            if *reporting {
                format!("{target} [reporting plugin]")
            } else {
                format!("{target} [plugin]")
            }
        }
        RelationshipKind::PluginDependency { plugin, target, .. } => {
            format!("{target} [plugin-dependency of {plugin}]")
        }
        RelationshipKind::Extension { target } => format!("{target} [extension]"),
    };
    if rel.is_optional() {
        out.push_str(" (optional)");
    }
    if rel.is_managed() {
        out.push_str(" (managed)");
    }
    out
}

/// Renders a traversal as an indented tree, one accepted edge per line.
///
/// Edges that point back into the active path are marked `(cycle)`; a project
/// whose subtree was already printed is marked `(*)` and not expanded again.
#[derive(Debug, Default)]
pub struct TreeRenderer {
    output: String,
    printed: HashSet<ProjectVersionRef>,
    max_depth: Option<usize>,
}

impl TreeRenderer {
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }
}

impl TraversalVisitor for TreeRenderer {
    fn enter_root(&mut self, root: &ProjectVersionRef) -> bool {
        self.output.push_str(&format!("{root}\n"));
        self.printed.insert(root.clone());
        true
    }

    fn visit(&mut self, rel: &Relationship, depth: usize, path: &[Relationship]) -> bool {
        let indent = "   ".repeat(depth - 1);
        let line = render_edge(rel);
        let closes_cycle =
            rel.is_self_loop() || path.iter().any(|e| e.declaring() == rel.target());
        if closes_cycle {
            self.output.push_str(&format!("{indent}+- {line} (cycle)\n"));
            return false;
        }
        if !self.printed.insert(rel.target().clone()) {
            self.output.push_str(&format!("{indent}+- {line} (*)\n"));
            return false;
        }
        self.output.push_str(&format!("{indent}+- {line}\n"));
        self.max_depth.map_or(true, |max| depth < max)
    }
}
