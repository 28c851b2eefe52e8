use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use relgraph_util::errors::{GraphError, GraphResult};

use crate::relationship::RelationshipType;
use crate::scope::{DependencyScope, ScopeTransitivity};

/// Global user configuration loaded from `~/.relgraph/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub traversal: TraversalConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Which backend holds workspaces, from `[store]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    #[default]
    Sqlite,
}

/// Workspace storage settings from `[store]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Directory holding durable workspace files. Defaults to `<home>/workspaces`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl StoreConfig {
    pub fn workspace_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| dirs_path().join("workspaces"))
    }
}

/// Default traversal filter from `[traversal]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// Relationship type aliases to follow.
    #[serde(default = "default_types")]
    pub types: Vec<String>,
    #[serde(default)]
    pub scope: Option<DependencyScope>,
    #[serde(default)]
    pub transitivity: ScopeTransitivity,
    #[serde(default, rename = "include-managed")]
    pub include_managed: bool,
    #[serde(default = "default_include_optional", rename = "include-optional")]
    pub include_optional: bool,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            types: default_types(),
            scope: None,
            transitivity: ScopeTransitivity::default(),
            include_managed: false,
            include_optional: default_include_optional(),
        }
    }
}

fn default_types() -> Vec<String> {
    RelationshipType::ALL
        .iter()
        .map(|t| t.name().to_string())
        .collect()
}

fn default_include_optional() -> bool {
    true
}

impl TraversalConfig {
    /// Resolve the configured aliases. Unknown aliases are skipped with a warning.
    pub fn relationship_types(&self) -> Vec<RelationshipType> {
        let mut types = Vec::new();
        for alias in &self.types {
            match RelationshipType::from_alias(alias) {
                Some(t) if !types.contains(&t) => types.push(t),
                Some(_) => {}
                None => tracing::warn!("ignoring unknown relationship type '{alias}' in config"),
            }
        }
        types
    }

    /// Scope threshold, defaulting to `test` (which implies every other scope).
    pub fn scope_threshold(&self) -> DependencyScope {
        self.scope.unwrap_or(DependencyScope::Test)
    }
}

/// Logging settings from `[log]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl GlobalConfig {
    /// Load the global configuration from `~/.relgraph/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> GraphResult<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from an explicit path, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> GraphResult<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| GraphError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse_toml(&content)
    }

    pub fn parse_toml(content: &str) -> GraphResult<Self> {
        toml::from_str(content).map_err(|e| GraphError::Config {
            message: format!("Failed to parse config: {e}"),
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the relgraph data directory.
///
/// `RELGRAPH_HOME` wins; otherwise `~/.relgraph/`.
pub fn dirs_path() -> PathBuf {
    if let Ok(home) = std::env::var("RELGRAPH_HOME") {
        if !home.is_empty() {
            return PathBuf::from(home);
        }
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".relgraph")
}
