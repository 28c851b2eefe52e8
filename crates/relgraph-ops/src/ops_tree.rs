//! Operation: render the accepted traversal as a tree.

use relgraph_core::config::GlobalConfig;
use relgraph_core::coordinate::ProjectVersionRef;
use relgraph_traverse::render::TreeRenderer;
use relgraph_traverse::Traversal;

use crate::{open_source, FilterOptions, GraphSource};

/// Options for `relgraph tree`.
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    pub filter: FilterOptions,
    /// Maximum depth to display.
    pub depth: Option<usize>,
}

pub fn tree(
    config: &GlobalConfig,
    source: &GraphSource,
    root: &ProjectVersionRef,
    opts: &TreeOptions,
) -> miette::Result<String> {
    let store = open_source(config, source)?;
    let filter = opts.filter.filter(config)?;
    let mut renderer = TreeRenderer::new(opts.depth);
    Traversal::new(store.as_ref(), filter).run(std::slice::from_ref(root), &mut renderer)?;
    Ok(renderer.into_output())
}
