//! Handler for `relgraph import`.

use std::path::Path;

use miette::Result;

use relgraph_core::config::GlobalConfig;
use relgraph_ops::ops_import;

pub fn exec(config: &GlobalConfig, file: &Path, workspace: &str) -> Result<()> {
    let summary = ops_import::import(config, file, workspace)?;
    println!(
        "Imported {} new relationship(s) into '{workspace}' ({} already present)",
        summary.added,
        summary.read - summary.added
    );
    Ok(())
}
