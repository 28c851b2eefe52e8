//! Relationship graph storage.
//!
//! The graph algorithms depend only on [`RelationshipGraphStore`]. Two
//! backends implement it:
//!
//! - [`memory::MemoryStore`]: volatile, in-process, backed by petgraph
//! - [`sqlite::SqliteStore`]: durable, one SQLite file per workspace
//!
//! Workspaces are opened and released through a [`GraphDriver`].

pub mod memory;
pub mod sqlite;
pub mod store;

pub use store::{validate_workspace_key, GraphDriver, RelationshipGraphStore};
