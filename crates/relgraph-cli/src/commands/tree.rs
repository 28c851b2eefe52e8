//! Handler for `relgraph tree`.

use miette::Result;

use relgraph_core::config::GlobalConfig;
use relgraph_ops::ops_tree::{self, TreeOptions};
use relgraph_ops::{parse_project, FilterOptions, GraphSource};

pub fn exec(
    config: &GlobalConfig,
    root: &str,
    source: GraphSource,
    filter: FilterOptions,
    depth: Option<usize>,
) -> Result<()> {
    let root = parse_project(root)?;
    let opts = TreeOptions { filter, depth };
    print!("{}", ops_tree::tree(config, &source, &root, &opts)?);
    Ok(())
}
