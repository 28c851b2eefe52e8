use miette::Result;

use relgraph_core::config::GlobalConfig;
use relgraph_ops::ops_workspace;

use crate::cli::WorkspaceAction;

pub fn exec(config: &GlobalConfig, action: WorkspaceAction) -> Result<()> {
    match action {
        WorkspaceAction::List => {
            let keys = ops_workspace::list(config)?;
            if keys.is_empty() {
                println!("No workspaces.");
            }
            for key in keys {
                println!("{key}");
            }
            Ok(())
        }
        WorkspaceAction::Delete { key } => {
            if ops_workspace::delete(config, &key)? {
                println!("Deleted workspace '{key}'");
            } else {
                println!("Workspace '{key}' does not exist");
            }
            Ok(())
        }
    }
}
