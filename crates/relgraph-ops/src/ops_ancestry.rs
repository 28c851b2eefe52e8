//! Operation: print a project's parent chain.

use relgraph_core::config::GlobalConfig;
use relgraph_core::coordinate::ProjectVersionRef;
use relgraph_traverse::ancestry::ancestry as parent_chain;

use crate::{open_source, GraphSource};

pub fn ancestry(
    config: &GlobalConfig,
    source: &GraphSource,
    project: &ProjectVersionRef,
) -> miette::Result<Vec<ProjectVersionRef>> {
    let store = open_source(config, source)?;
    Ok(parent_chain(store.as_ref(), project)?)
}
