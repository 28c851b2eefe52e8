//! CLI argument definitions for relgraph.
//!
//! Uses `clap` derive macros to define the full command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use relgraph_ops::{FilterOptions, GraphSource};

#[derive(Parser, Debug)]
#[command(
    name = "relgraph",
    version,
    about = "Query relationship graphs of versioned projects",
    long_about = "relgraph stores parent, dependency, plugin and extension relationships \
                  between group:artifact:version coordinates and answers questions about \
                  them: build order, cycles, trees, ancestry and dependents."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this config file instead of ~/.relgraph/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a graph description file into a workspace
    Import {
        /// TOML graph description
        file: PathBuf,
        /// Target workspace key
        #[arg(short, long)]
        workspace: String,
    },

    /// Print the build order of everything reachable from the roots
    Order {
        /// Root projects (group:artifact:version)
        #[arg(required = true)]
        roots: Vec<String>,
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print only the cycles reachable from the roots
    Cycles {
        /// Root projects (group:artifact:version)
        #[arg(required = true)]
        roots: Vec<String>,
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Render the accepted relationships below a project as a tree
    Tree {
        /// Root project (group:artifact:version)
        root: String,
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// Print the parent chain of a project
    Ancestry {
        /// Project (group:artifact:version)
        project: String,
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the projects whose relationships target a project
    Dependents {
        /// Project (group:artifact:version)
        project: String,
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Manage stored workspaces
    Workspace {
        #[command(subcommand)]
        action: WorkspaceAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum WorkspaceAction {
    /// List workspace keys
    List,
    /// Delete a workspace and its data
    Delete { key: String },
}

/// Where to read the graph from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Read relationships from a graph description file
    #[arg(long, value_name = "FILE")]
    pub graph: Option<PathBuf>,
    /// Read relationships from a stored workspace
    #[arg(short, long, value_name = "KEY")]
    pub workspace: Option<String>,
}

impl SourceArgs {
    pub fn into_source(self) -> GraphSource {
        match (self.graph, self.workspace) {
            (Some(path), _) => GraphSource::File(path),
            (None, Some(key)) => GraphSource::Workspace(key),
            // clap's group guarantees one of the two.
            (None, None) => GraphSource::Workspace(String::new()),
        }
    }
}

/// Overrides for the `[traversal]` config section.
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Highest dependency scope to accept (provided, compile, runtime, system, test)
    #[arg(short, long)]
    pub scope: Option<String>,
    /// Relationship types to follow, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub types: Option<Vec<String>>,
    /// Keep dependency scopes unchanged while descending
    #[arg(long)]
    pub passthrough: bool,
}

impl From<FilterArgs> for FilterOptions {
    fn from(args: FilterArgs) -> Self {
        FilterOptions {
            types: args.types,
            scope: args.scope,
            passthrough: args.passthrough,
        }
    }
}

/// Parse command-line arguments.
pub fn parse() -> Cli {
    Cli::parse()
}
