//! Operation: list and delete workspaces.

use relgraph_core::config::GlobalConfig;

use crate::open_driver;

pub fn list(config: &GlobalConfig) -> miette::Result<Vec<String>> {
    Ok(open_driver(config).workspace_keys()?)
}

/// Delete a workspace. Returns `false` if it did not exist.
pub fn delete(config: &GlobalConfig, key: &str) -> miette::Result<bool> {
    let deleted = open_driver(config).delete_workspace(key)?;
    if deleted {
        tracing::info!("deleted workspace '{key}'");
    }
    Ok(deleted)
}
