//! Operation: reverse lookup of the projects pointing at a project.

use relgraph_core::config::GlobalConfig;
use relgraph_core::coordinate::ProjectVersionRef;
use relgraph_core::relationship::Relationship;
use relgraph_traverse::dependents::dependents as accepted_dependents;

use crate::{open_source, FilterOptions, GraphSource};

pub fn dependents(
    config: &GlobalConfig,
    source: &GraphSource,
    project: &ProjectVersionRef,
    opts: &FilterOptions,
) -> miette::Result<Vec<Relationship>> {
    let store = open_source(config, source)?;
    if !store.contains_project(project)? {
        tracing::warn!("{project} does not appear in the graph");
    }
    let filter = opts.filter(config)?;
    Ok(accepted_dependents(store.as_ref(), project, &filter)?)
}
