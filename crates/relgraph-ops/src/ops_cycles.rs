//! Operation: list the cycles reachable from a set of roots.

use std::collections::BTreeSet;

use relgraph_core::config::GlobalConfig;
use relgraph_core::coordinate::ProjectVersionRef;
use relgraph_traverse::{build_order, CancellationToken, Completion, Cycle};

use crate::{open_source, FilterOptions, GraphSource};

/// The cycles `order` reports for the same roots and filter. Every accepted
/// edge that lies on a cycle belongs to at least one of them.
pub fn cycles(
    config: &GlobalConfig,
    source: &GraphSource,
    roots: &[ProjectVersionRef],
    opts: &FilterOptions,
    cancel: &CancellationToken,
) -> miette::Result<Completion<BTreeSet<Cycle>>> {
    let store = open_source(config, source)?;
    let filter = opts.filter(config)?;
    let outcome = build_order(store.as_ref(), roots, &filter, cancel)?
        .map(|order| order.cycles().clone());
    tracing::info!("found {} cycle(s)", outcome.value().len());
    Ok(outcome)
}
