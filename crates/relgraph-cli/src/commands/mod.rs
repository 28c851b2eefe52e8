//! Command dispatch and handler modules.

mod ancestry;
mod cycles;
mod dependents;
mod import;
mod order;
mod tree;
mod workspace;

use miette::Result;

use relgraph_core::config::GlobalConfig;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli, config: &GlobalConfig) -> Result<()> {
    match cli.command {
        Command::Import { file, workspace } => import::exec(config, &file, &workspace),
        Command::Order {
            roots,
            source,
            filter,
            json,
        } => order::exec(config, &roots, source.into_source(), filter.into(), json),
        Command::Cycles {
            roots,
            source,
            filter,
        } => cycles::exec(config, &roots, source.into_source(), filter.into()),
        Command::Tree {
            root,
            source,
            filter,
            depth,
        } => tree::exec(config, &root, source.into_source(), filter.into(), depth),
        Command::Ancestry { project, source } => {
            ancestry::exec(config, &project, source.into_source())
        }
        Command::Dependents {
            project,
            source,
            filter,
        } => dependents::exec(config, &project, source.into_source(), filter.into()),
        Command::Workspace { action } => workspace::exec(config, action),
    }
}
