//! Depth-first traversal over a relationship store.
//!
//! The walker keeps an explicit stack of frames instead of recursing, so very
//! deep graphs cannot exhaust the call stack. Each frame holds the outbound
//! edges of one node on the active path together with the filter that applies
//! beneath it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use relgraph_core::coordinate::ProjectVersionRef;
use relgraph_core::relationship::Relationship;
use relgraph_store::RelationshipGraphStore;
use relgraph_util::errors::GraphResult;

use crate::cycle::{Cycle, CycleDetector};
use crate::filter::RelationshipFilter;

/// Callbacks driven by [`Traversal::run`].
///
/// The engine never deduplicates across branches. A visitor that wants each
/// project once returns `false` from [`visit`](Self::visit) or
/// [`expand`](Self::expand) for targets it has already expanded. What is
/// accepted below a target depends on the path taken to it, so `expand` is
/// the place to key on [`RelationshipFilter::scope_state`].
pub trait TraversalVisitor {
    /// Called before walking `root`. Returning `false` skips it.
    fn enter_root(&mut self, _root: &ProjectVersionRef) -> bool {
        true
    }

    /// Called for every accepted edge. `path` holds the edges from the root
    /// down to the edge's declaring project. Return `false` to stop the
    /// engine from descending into the target.
    fn visit(&mut self, rel: &Relationship, depth: usize, path: &[Relationship]) -> bool;

    /// Called before descending into the target of a visited edge that did not
    /// close a cycle. `below` is the filter for the target's own edges, or
    /// `None` when nothing below it can be accepted; the target is then left
    /// straight away. Return `false` to skip the target entirely.
    fn expand(&mut self, _target: &ProjectVersionRef, _below: Option<&RelationshipFilter>) -> bool {
        true
    }

    /// Called after an edge closed a cycle on the active path.
    fn cycle(&mut self, _cycle: &Cycle) {}

    /// Called once every accepted edge below `project` has been processed.
    fn leave(&mut self, _project: &ProjectVersionRef) {}
}

/// Cooperative cancellation flag shared between a traversal and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A result that may have been cut short by cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    Complete(T),
    /// Everything accumulated before the cancellation was observed.
    Cancelled(T),
}

impl<T> Completion<T> {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Complete(v) | Self::Cancelled(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Complete(v) | Self::Cancelled(v) => v,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Completion<U> {
        match self {
            Self::Complete(v) => Completion::Complete(f(v)),
            Self::Cancelled(v) => Completion::Cancelled(f(v)),
        }
    }
}

struct Frame {
    project: ProjectVersionRef,
    edges: Vec<Relationship>,
    next: usize,
    filter: RelationshipFilter,
}

/// A configured walk: store, filter and cancellation token.
///
/// Holds no state between runs, so running twice over an unmodified store
/// gives identical callbacks in identical order.
pub struct Traversal<'a> {
    store: &'a dyn RelationshipGraphStore,
    filter: RelationshipFilter,
    cancel: CancellationToken,
}

impl<'a> Traversal<'a> {
    pub fn new(store: &'a dyn RelationshipGraphStore, filter: RelationshipFilter) -> Self {
        Self {
            store,
            filter,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Walk every root in order, driving `visitor`.
    ///
    /// Returns the cycles found, wrapped as cancelled if the token was set
    /// before the walk finished. Store failures abort the walk with a
    /// connection error naming the root and the edge being expanded.
    pub fn run(
        &self,
        roots: &[ProjectVersionRef],
        visitor: &mut dyn TraversalVisitor,
    ) -> GraphResult<Completion<CycleDetector>> {
        let mut cycles = CycleDetector::new();
        for root in roots {
            if self.cancel.is_cancelled() {
                debug!("traversal cancelled before root {root}");
                return Ok(Completion::Cancelled(cycles));
            }
            if !visitor.enter_root(root) {
                trace!("skipping root {root}");
                continue;
            }
            debug!("traversing from {root}");
            if !self.walk(root, visitor, &mut cycles)? {
                return Ok(Completion::Cancelled(cycles));
            }
        }
        Ok(Completion::Complete(cycles))
    }

    /// Walk one root. Returns `false` if cancelled part way.
    fn walk(
        &self,
        root: &ProjectVersionRef,
        visitor: &mut dyn TraversalVisitor,
        cycles: &mut CycleDetector,
    ) -> GraphResult<bool> {
        let root_key = root.to_string();
        let edges = self.fetch(root, &root_key, None)?;
        let mut stack = vec![Frame {
            project: root.clone(),
            edges,
            next: 0,
            filter: self.filter.clone(),
        }];
        // Edge into stack[i + 1] sits at path[i].
        let mut path: Vec<Relationship> = Vec::new();
        let mut on_path: HashMap<ProjectVersionRef, usize> = HashMap::from([(root.clone(), 0)]);

        while let Some(frame) = stack.last_mut() {
            if self.cancel.is_cancelled() {
                debug!("traversal from {root} cancelled at {}", frame.project);
                return Ok(false);
            }

            let Some(rel) = frame.edges.get(frame.next).cloned() else {
                let done = stack.pop().map(|f| f.project);
                if let Some(project) = done {
                    on_path.remove(&project);
                    path.pop();
                    visitor.leave(&project);
                }
                continue;
            };
            frame.next += 1;

            let depth = stack.len();
            let filter = &stack[depth - 1].filter;
            if !filter.accepts(&rel, depth) {
                trace!("rejected {rel}");
                continue;
            }
            let descend = visitor.visit(&rel, depth, &path);

            if let Some(&pos) = on_path.get(rel.target()) {
                let mut segment = path[pos..].to_vec();
                segment.push(rel);
                let (cycle, added) = cycles.record(segment);
                if added {
                    debug!("cycle detected: {cycle}");
                }
                visitor.cycle(cycle);
                continue;
            }
            if !descend {
                continue;
            }
            let below = filter.child_filter(&rel);
            if !visitor.expand(rel.target(), below.as_ref()) {
                continue;
            }
            // The target still gets a frame so visitors see it leave.
            let (edges, child_filter) = match below {
                Some(child) => (self.fetch(rel.target(), &root_key, Some(&rel))?, child),
                None => {
                    trace!("nothing can be accepted below {rel}");
                    (Vec::new(), filter.clone())
                }
            };
            on_path.insert(rel.target().clone(), stack.len());
            stack.push(Frame {
                project: rel.target().clone(),
                edges,
                next: 0,
                filter: child_filter,
            });
            path.push(rel);
        }
        Ok(true)
    }

    fn fetch(
        &self,
        project: &ProjectVersionRef,
        root: &str,
        via: Option<&Relationship>,
    ) -> GraphResult<Vec<Relationship>> {
        let edges = self.store.relationships_declared_by(project).map_err(|e| {
            let edge = via.map(ToString::to_string);
            e.with_traversal_context(root, edge.as_deref())
        })?;
        trace!("{project} declares {} relationships", edges.len());
        Ok(edges.into_iter().collect())
    }
}
