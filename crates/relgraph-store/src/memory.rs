//! Volatile in-process backend.
//!
//! Edges live in a petgraph `DiGraph` keyed by project coordinate. The whole
//! workspace sits behind an `RwLock`, so readers proceed in parallel and each
//! add is applied atomically under the write lock.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use tracing::debug;

use relgraph_core::coordinate::ProjectVersionRef;
use relgraph_core::relationship::Relationship;
use relgraph_util::errors::{GraphError, GraphResult};

use crate::store::{validate_workspace_key, GraphDriver, RelationshipGraphStore};

#[derive(Default)]
struct Inner {
    graph: DiGraph<ProjectVersionRef, Relationship>,
    /// Lookup from coordinate to node index.
    index: HashMap<ProjectVersionRef, NodeIndex>,
    edges: HashSet<Relationship>,
}

impl Inner {
    fn node(&mut self, project: &ProjectVersionRef) -> NodeIndex {
        if let Some(&idx) = self.index.get(project) {
            return idx;
        }
        let idx = self.graph.add_node(project.clone());
        self.index.insert(project.clone(), idx);
        idx
    }

    fn edges_of(&self, project: &ProjectVersionRef, dir: Direction) -> BTreeSet<Relationship> {
        match self.index.get(project) {
            Some(&idx) => self
                .graph
                .edges_directed(idx, dir)
                .map(|e| e.weight().clone())
                .collect(),
            None => BTreeSet::new(),
        }
    }
}

/// A workspace held entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> GraphResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| GraphError::connection("in-memory workspace lock poisoned"))
    }

    fn write(&self) -> GraphResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| GraphError::connection("in-memory workspace lock poisoned"))
    }

    /// Number of stored edges.
    pub fn len(&self) -> GraphResult<usize> {
        Ok(self.read()?.edges.len())
    }

    pub fn is_empty(&self) -> GraphResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl RelationshipGraphStore for MemoryStore {
    fn add_relationship(&self, rel: Relationship) -> GraphResult<bool> {
        rel.validate()?;
        let mut inner = self.write()?;
        if inner.edges.contains(&rel) {
            return Ok(false);
        }
        let from = inner.node(rel.declaring());
        let to = inner.node(rel.target());
        debug!("storing {rel}");
        inner.graph.add_edge(from, to, rel.clone());
        inner.edges.insert(rel);
        Ok(true)
    }

    fn relationships_declared_by(
        &self,
        project: &ProjectVersionRef,
    ) -> GraphResult<BTreeSet<Relationship>> {
        Ok(self.read()?.edges_of(project, Direction::Outgoing))
    }

    fn relationships_targeting(
        &self,
        project: &ProjectVersionRef,
    ) -> GraphResult<BTreeSet<Relationship>> {
        Ok(self.read()?.edges_of(project, Direction::Incoming))
    }

    fn all_relationships(&self) -> GraphResult<BTreeSet<Relationship>> {
        Ok(self.read()?.edges.iter().cloned().collect())
    }

    fn contains_project(&self, project: &ProjectVersionRef) -> GraphResult<bool> {
        Ok(self.read()?.index.contains_key(project))
    }

    fn contains_relationship(&self, rel: &Relationship) -> GraphResult<bool> {
        Ok(self.read()?.edges.contains(rel))
    }

    fn all_project_versions(&self) -> GraphResult<BTreeSet<ProjectVersionRef>> {
        Ok(self.read()?.index.keys().cloned().collect())
    }
}

/// Keeps in-memory workspaces alive until they are deleted.
#[derive(Default)]
pub struct MemoryDriver {
    workspaces: Mutex<HashMap<String, Arc<MemoryStore>>>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn workspaces(
        &self,
    ) -> GraphResult<std::sync::MutexGuard<'_, HashMap<String, Arc<MemoryStore>>>> {
        self.workspaces
            .lock()
            .map_err(|_| GraphError::connection("workspace registry lock poisoned"))
    }
}

impl GraphDriver for MemoryDriver {
    fn open_workspace(&self, key: &str) -> GraphResult<Arc<dyn RelationshipGraphStore>> {
        validate_workspace_key(key)?;
        let store: Arc<dyn RelationshipGraphStore> = self
            .workspaces()?
            .entry(key.to_string())
            .or_insert_with(|| {
                debug!("creating in-memory workspace '{key}'");
                Arc::new(MemoryStore::new())
            })
            .clone();
        Ok(store)
    }

    fn workspace_keys(&self) -> GraphResult<Vec<String>> {
        let mut keys: Vec<String> = self.workspaces()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn delete_workspace(&self, key: &str) -> GraphResult<bool> {
        Ok(self.workspaces()?.remove(key).is_some())
    }
}
