//! Operation: compute a build order.

use relgraph_core::config::GlobalConfig;
use relgraph_core::coordinate::ProjectVersionRef;
use relgraph_traverse::{build_order, BuildOrder, CancellationToken, Completion};

use crate::{open_source, FilterOptions, GraphSource};

/// Build order of everything reachable from `roots`.
pub fn order(
    config: &GlobalConfig,
    source: &GraphSource,
    roots: &[ProjectVersionRef],
    opts: &FilterOptions,
    cancel: &CancellationToken,
) -> miette::Result<Completion<BuildOrder>> {
    let store = open_source(config, source)?;
    let filter = opts.filter(config)?;
    tracing::debug!("build order from {} root(s) with {filter:?}", roots.len());

    let result = build_order(store.as_ref(), roots, &filter, cancel)?;
    let value = result.value();
    for cycle in value.cycles() {
        tracing::warn!("cycle in build order: {cycle}");
    }
    if !result.is_complete() {
        tracing::warn!(
            "build order cancelled after {} project(s); result is incomplete",
            value.order().len()
        );
    }
    tracing::info!("ordered {} project(s)", value.order().len());
    Ok(result)
}
