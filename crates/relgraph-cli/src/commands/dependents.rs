//! Handler for `relgraph dependents`.

use miette::Result;

use relgraph_core::config::GlobalConfig;
use relgraph_ops::{ops_dependents, parse_project, FilterOptions, GraphSource};

pub fn exec(
    config: &GlobalConfig,
    project: &str,
    source: GraphSource,
    filter: FilterOptions,
) -> Result<()> {
    let project = parse_project(project)?;
    let rels = ops_dependents::dependents(config, &source, &project, &filter)?;
    if rels.is_empty() {
        println!("Nothing depends on {project}.");
        return Ok(());
    }
    for rel in &rels {
        println!("{} [{}]", rel.declaring(), rel.rel_type());
    }
    Ok(())
}
