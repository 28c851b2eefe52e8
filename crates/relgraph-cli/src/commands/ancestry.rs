use miette::Result;

use relgraph_core::config::GlobalConfig;
use relgraph_ops::{ops_ancestry, parse_project, GraphSource};

pub fn exec(config: &GlobalConfig, project: &str, source: GraphSource) -> Result<()> {
    let project = parse_project(project)?;
    for (i, ancestor) in ops_ancestry::ancestry(config, &source, &project)?
        .iter()
        .enumerate()
    {
        let indent = "  ".repeat(i);
        println!("{indent}{ancestor}");
    }
    Ok(())
}
