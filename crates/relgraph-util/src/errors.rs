use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all relgraph operations.
///
/// Cycles and cancelled traversals are reported through result values, never
/// through this type.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    /// The graph backend is unreachable or its data is corrupted.
    #[error("Graph store connection failed: {message}{}", connection_context(.root, .edge))]
    #[diagnostic(help("Check that the workspace storage is reachable and not corrupted"))]
    Connection {
        message: String,
        /// Traversal root being walked when the failure happened.
        root: Option<String>,
        /// Edge whose target was being expanded.
        edge: Option<String>,
    },

    /// A relationship is malformed and was not stored.
    #[error("Invalid relationship: {message}")]
    InvalidRelationship { message: String },

    /// A workspace key is unusable.
    #[error("Invalid workspace '{key}': {message}")]
    #[diagnostic(help("Workspace keys may only contain letters, digits, '.', '_' and '-'"))]
    InvalidWorkspace { key: String, message: String },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check ~/.relgraph/config.toml for syntax errors"))]
    Config { message: String },

    /// Invalid graph description file.
    #[error("Graph file error: {message}")]
    GraphFile { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

impl GraphError {
    /// Shorthand for a context-free connection failure.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            root: None,
            edge: None,
        }
    }

    /// Attach traversal context to a connection failure. Other variants pass through.
    pub fn with_traversal_context(self, root: &str, edge: Option<&str>) -> Self {
        match self {
            Self::Connection {
                message,
                root: None,
                edge: None,
            } => Self::Connection {
                message,
                root: Some(root.to_string()),
                edge: edge.map(str::to_string),
            },
            other => other,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

fn connection_context(root: &Option<String>, edge: &Option<String>) -> String {
    match (root, edge) {
        (Some(r), Some(e)) => format!(" (root {r}, edge {e})"),
        (Some(r), None) => format!(" (root {r})"),
        (None, Some(e)) => format!(" (edge {e})"),
        (None, None) => String::new(),
    }
}

/// Result alias for library code.
pub type GraphResult<T> = Result<T, GraphError>;
