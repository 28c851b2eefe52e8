//! Dependency-first build ordering.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use tracing::debug;

use relgraph_core::coordinate::{ProjectRef, ProjectVersionRef};
use relgraph_core::relationship::Relationship;
use relgraph_store::RelationshipGraphStore;
use relgraph_util::errors::GraphResult;

use crate::cycle::{Cycle, CycleDetector};
use crate::filter::{RelationshipFilter, ScopeState};
use crate::traversal::{CancellationToken, Completion, Traversal, TraversalVisitor};

/// Projects in an order where every accepted dependency precedes its
/// dependents, plus the cycles that made a strict order impossible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildOrder {
    order: Vec<ProjectRef>,
    cycles: BTreeSet<Cycle>,
}

impl BuildOrder {
    pub fn order(&self) -> &[ProjectRef] {
        &self.order
    }

    pub fn cycles(&self) -> &BTreeSet<Cycle> {
        &self.cycles
    }

    pub fn position(&self, project: &ProjectRef) -> Option<usize> {
        self.order.iter().position(|p| p == project)
    }
}

impl fmt::Display for BuildOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, project) in self.order.iter().enumerate() {
            writeln!(f, "{:>4}. {project}", i + 1)?;
        }
        if !self.cycles.is_empty() {
            writeln!(f, "\nCycles ({}):", self.cycles.len())?;
            for cycle in &self.cycles {
                writeln!(f, "  {cycle}")?;
            }
        }
        Ok(())
    }
}

/// Collects the accepted edges reachable from the roots; [`finish`](Self::finish)
/// turns them into a [`BuildOrder`].
///
/// A versioned project is expanded once per scope state, so a project first
/// reached through a narrow edge is expanded again when a later path accepts
/// more below it. Placement works on unversioned projects: every accepted edge
/// from any version of a project counts as an edge of that project.
#[derive(Debug)]
pub struct BuildOrderVisitor {
    roots: Vec<ProjectRef>,
    root_state: ScopeState,
    expanded: HashSet<(ProjectVersionRef, ScopeState)>,
    edges: Vec<Relationship>,
    seen: HashSet<Relationship>,
    // Projects entered but not yet left.
    open: Vec<ProjectVersionRef>,
}

impl BuildOrderVisitor {
    /// A visitor for a traversal that starts with `filter` at every root.
    pub fn new(filter: &RelationshipFilter) -> Self {
        Self {
            roots: Vec::new(),
            root_state: filter.scope_state(),
            expanded: HashSet::new(),
            edges: Vec::new(),
            seen: HashSet::new(),
            open: Vec::new(),
        }
    }

    /// Accepted edges in the order they were first visited.
    pub fn edges(&self) -> &[Relationship] {
        &self.edges
    }

    /// Place every fully processed project and complete the cycle report.
    ///
    /// After a cancelled walk the projects still on the active path are left
    /// out, so the order only holds projects whose accepted edges were all
    /// processed.
    pub fn finish(self, mut cycles: CycleDetector) -> BuildOrder {
        let by_project = self.edges_by_project();
        for segment in closed_paths(&self.edges, &by_project) {
            let (cycle, added) = cycles.record(segment);
            if added {
                debug!("cycle through already expanded projects: {cycle}");
            }
        }
        let unfinished: HashSet<&ProjectRef> =
            self.open.iter().map(ProjectVersionRef::project_ref).collect();
        BuildOrder {
            order: post_order(&self.roots, &by_project, &unfinished),
            cycles: cycles.into_cycles(),
        }
    }

    fn edges_by_project(&self) -> HashMap<&ProjectRef, Vec<&Relationship>> {
        let mut by_project: HashMap<&ProjectRef, Vec<&Relationship>> = HashMap::new();
        for rel in &self.edges {
            by_project
                .entry(rel.declaring().project_ref())
                .or_default()
                .push(rel);
        }
        by_project
    }
}

impl TraversalVisitor for BuildOrderVisitor {
    fn enter_root(&mut self, root: &ProjectVersionRef) -> bool {
        if !self.roots.contains(root.project_ref()) {
            self.roots.push(root.project_ref().clone());
        }
        if !self.expanded.insert((root.clone(), self.root_state.clone())) {
            return false;
        }
        self.open.push(root.clone());
        true
    }

    fn visit(&mut self, rel: &Relationship, _depth: usize, _path: &[Relationship]) -> bool {
        if self.seen.insert(rel.clone()) {
            self.edges.push(rel.clone());
        }
        true
    }

    fn expand(&mut self, target: &ProjectVersionRef, below: Option<&RelationshipFilter>) -> bool {
        if let Some(below) = below {
            if !self.expanded.insert((target.clone(), below.scope_state())) {
                return false;
            }
        }
        self.open.push(target.clone());
        true
    }

    fn leave(&mut self, _project: &ProjectVersionRef) {
        self.open.pop();
    }
}

/// Depth-first post-order over the project graph, roots first and edges in
/// discovery order. An edge back onto the active path is the break point of a
/// cycle and is skipped.
fn post_order(
    roots: &[ProjectRef],
    by_project: &HashMap<&ProjectRef, Vec<&Relationship>>,
    unfinished: &HashSet<&ProjectRef>,
) -> Vec<ProjectRef> {
    let mut order = Vec::new();
    let mut done: HashSet<&ProjectRef> = HashSet::new();
    let mut active: HashSet<&ProjectRef> = HashSet::new();
    for root in roots {
        if done.contains(root) {
            continue;
        }
        active.insert(root);
        let mut stack: Vec<(&ProjectRef, usize)> = vec![(root, 0)];
        while let Some((project, next)) = stack.last_mut() {
            let edges = by_project.get(*project).map(Vec::as_slice).unwrap_or(&[]);
            if let Some(rel) = edges.get(*next) {
                *next += 1;
                let target = rel.target().project_ref();
                if !done.contains(target) && active.insert(target) {
                    stack.push((target, 0));
                }
                continue;
            }
            let project = *project;
            stack.pop();
            active.remove(project);
            done.insert(project);
            if !unfinished.contains(project) {
                order.push(project.clone());
            }
        }
    }
    order
}

/// One closed path per accepted edge that lies on a cycle: the edge followed by
/// the shortest way back to its source.
///
/// The walk only sees cycles that close on its active path; this also covers
/// cycles running through projects expanded on another branch.
fn closed_paths(
    edges: &[Relationship],
    by_project: &HashMap<&ProjectRef, Vec<&Relationship>>,
) -> Vec<Vec<Relationship>> {
    let mut graph: DiGraph<&ProjectRef, ()> = DiGraph::new();
    let mut nodes: HashMap<&ProjectRef, NodeIndex> = HashMap::new();
    for rel in edges {
        let from = *nodes
            .entry(rel.declaring().project_ref())
            .or_insert_with_key(|p| graph.add_node(*p));
        let to = *nodes
            .entry(rel.target().project_ref())
            .or_insert_with_key(|p| graph.add_node(*p));
        graph.add_edge(from, to, ());
    }
    let mut component: HashMap<&ProjectRef, usize> = HashMap::new();
    for (id, scc) in tarjan_scc(&graph).into_iter().enumerate() {
        for node in scc {
            component.insert(graph[node], id);
        }
    }

    let mut paths = Vec::new();
    for rel in edges {
        let from = rel.declaring().project_ref();
        let to = rel.target().project_ref();
        let Some(id) = component.get(from).copied() else {
            continue;
        };
        if component.get(to) != Some(&id) {
            continue;
        }
        if let Some(back) = shortest_path(to, from, id, &component, by_project) {
            let mut segment = vec![rel.clone()];
            segment.extend(back.into_iter().cloned());
            paths.push(segment);
        }
    }
    paths
}

/// Breadth-first search from `from` to `to` inside one strongly connected
/// component. An empty path means `from == to`.
fn shortest_path<'a>(
    from: &'a ProjectRef,
    to: &ProjectRef,
    id: usize,
    component: &HashMap<&ProjectRef, usize>,
    by_project: &HashMap<&'a ProjectRef, Vec<&'a Relationship>>,
) -> Option<Vec<&'a Relationship>> {
    if from == to {
        return Some(Vec::new());
    }
    let mut reached_by: HashMap<&ProjectRef, &Relationship> = HashMap::new();
    let mut queue = VecDeque::from([from]);
    while let Some(project) = queue.pop_front() {
        for &rel in by_project.get(project).map(Vec::as_slice).unwrap_or(&[]) {
            let next = rel.target().project_ref();
            if next == from || reached_by.contains_key(next) || component.get(next) != Some(&id) {
                continue;
            }
            reached_by.insert(next, rel);
            if next == to {
                let mut path = vec![rel];
                let mut at = rel.declaring().project_ref();
                while at != from {
                    let step = *reached_by.get(at)?;
                    path.push(step);
                    at = step.declaring().project_ref();
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(next);
        }
    }
    None
}

/// Compute the build order of everything reachable from `roots` through
/// edges `filter` accepts.
///
/// Cycles never fail the call; they are returned inside the order. Only a
/// store failure is an error.
pub fn build_order(
    store: &dyn RelationshipGraphStore,
    roots: &[ProjectVersionRef],
    filter: &RelationshipFilter,
    cancel: &CancellationToken,
) -> GraphResult<Completion<BuildOrder>> {
    let mut visitor = BuildOrderVisitor::new(filter);
    let outcome = Traversal::new(store, filter.clone())
        .with_cancellation(cancel.clone())
        .run(roots, &mut visitor)?;
    Ok(outcome.map(|cycles| visitor.finish(cycles)))
}
