//! Handler for `relgraph order`.

use miette::Result;

use relgraph_core::config::GlobalConfig;
use relgraph_ops::{ops_order, parse_projects, FilterOptions, GraphSource};
use relgraph_traverse::CancellationToken;
use relgraph_util::errors::GraphError;

pub fn exec(
    config: &GlobalConfig,
    roots: &[String],
    source: GraphSource,
    filter: FilterOptions,
    json: bool,
) -> Result<()> {
    let roots = parse_projects(roots)?;
    let result = ops_order::order(config, &source, &roots, &filter, &CancellationToken::new())?;
    let complete = result.is_complete();
    let order = result.into_inner();

    if json {
        let value = serde_json::json!({
            "complete": complete,
            "order": order.order(),
            "cycles": order.cycles(),
        });
        let text = serde_json::to_string_pretty(&value).map_err(|e| GraphError::Generic {
            message: format!("Failed to encode build order: {e}"),
        })?;
        println!("{text}");
        return Ok(());
    }

    print!("{order}");
    if !complete {
        println!("(incomplete: traversal was cancelled)");
    }
    Ok(())
}
