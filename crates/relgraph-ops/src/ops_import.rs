//! Operation: load a graph description file into a workspace.

use std::path::Path;

use relgraph_core::config::GlobalConfig;
use relgraph_core::graph_file::GraphFile;

use crate::open_driver;

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Relationships listed in the file.
    pub read: usize,
    /// Relationships that were not already in the workspace.
    pub added: usize,
}

/// Add every relationship in `file` to the workspace `key`.
///
/// The file is validated as a whole before anything is written.
pub fn import(config: &GlobalConfig, file: &Path, key: &str) -> miette::Result<ImportSummary> {
    let rels = GraphFile::from_path(file)?.into_relationships()?;
    let read = rels.len();
    let store = open_driver(config).open_workspace(key)?;
    let added = store.add_relationships(rels)?;
    tracing::info!(
        "imported {added} new of {read} relationships from {} into '{key}'",
        file.display()
    );
    Ok(ImportSummary { read, added })
}
