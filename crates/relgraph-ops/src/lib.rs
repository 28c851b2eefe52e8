pub mod ops_ancestry;
pub mod ops_cycles;
pub mod ops_dependents;
pub mod ops_import;
pub mod ops_order;
pub mod ops_tree;
pub mod ops_workspace;

use std::path::PathBuf;
use std::sync::Arc;

use relgraph_core::config::{GlobalConfig, StoreBackend};
use relgraph_core::coordinate::ProjectVersionRef;
use relgraph_core::graph_file::GraphFile;
use relgraph_core::relationship::RelationshipType;
use relgraph_core::scope::{DependencyScope, ScopeTransitivity};
use relgraph_store::memory::{MemoryDriver, MemoryStore};
use relgraph_store::sqlite::SqliteDriver;
use relgraph_store::{GraphDriver, RelationshipGraphStore};
use relgraph_traverse::RelationshipFilter;
use relgraph_util::errors::GraphError;

/// Where an operation reads its graph from.
#[derive(Debug, Clone)]
pub enum GraphSource {
    /// A graph description file, loaded into a throwaway in-memory store.
    File(PathBuf),
    /// A named workspace of the configured backend.
    Workspace(String),
}

/// Command-line overrides of the `[traversal]` config section.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Relationship type aliases; replaces the configured list when set.
    pub types: Option<Vec<String>>,
    pub scope: Option<String>,
    pub passthrough: bool,
}

impl FilterOptions {
    /// Merge these overrides over `config` and build the filter.
    pub fn filter(&self, config: &GlobalConfig) -> miette::Result<RelationshipFilter> {
        let mut traversal = config.traversal.clone();
        if let Some(ref types) = self.types {
            for alias in types {
                if RelationshipType::from_alias(alias).is_none() {
                    return Err(GraphError::Generic {
                        message: format!(
                            "Unknown relationship type '{alias}' (expected one of: {})",
                            RelationshipType::ALL.map(|t| t.name()).join(", ")
                        ),
                    }
                    .into());
                }
            }
            traversal.types = types.clone();
        }
        if let Some(ref scope) = self.scope {
            let parsed = DependencyScope::from_name(scope).ok_or_else(|| GraphError::Generic {
                message: format!("Unknown dependency scope '{scope}'"),
            })?;
            traversal.scope = Some(parsed);
        }
        if self.passthrough {
            traversal.transitivity = ScopeTransitivity::Passthrough;
        }
        Ok(RelationshipFilter::from_config(&traversal))
    }
}

/// Build the workspace driver selected by `[store] backend`.
pub fn open_driver(config: &GlobalConfig) -> Box<dyn GraphDriver> {
    match config.store.backend {
        StoreBackend::Sqlite => Box::new(SqliteDriver::new(config.store.workspace_dir())),
        StoreBackend::Memory => {
            tracing::warn!("in-memory workspaces do not outlive this process");
            Box::new(MemoryDriver::new())
        }
    }
}

/// Open the store an operation should read.
pub fn open_source(
    config: &GlobalConfig,
    source: &GraphSource,
) -> miette::Result<Arc<dyn RelationshipGraphStore>> {
    match source {
        GraphSource::File(path) => {
            let rels = GraphFile::from_path(path)?.into_relationships()?;
            let store = MemoryStore::new();
            let added = store.add_relationships(rels)?;
            tracing::debug!("loaded {added} relationships from {}", path.display());
            Ok(Arc::new(store))
        }
        GraphSource::Workspace(key) => Ok(open_driver(config).open_workspace(key)?),
    }
}

/// Parse a `group:artifact:version` argument.
pub fn parse_project(s: &str) -> miette::Result<ProjectVersionRef> {
    let project = ProjectVersionRef::parse(s).ok_or_else(|| GraphError::Generic {
        message: format!("Invalid project '{s}': expected group:artifact:version"),
    })?;
    project.validate()?;
    Ok(project)
}

pub fn parse_projects(args: &[String]) -> miette::Result<Vec<ProjectVersionRef>> {
    args.iter().map(|s| parse_project(s)).collect()
}
