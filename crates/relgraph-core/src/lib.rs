//! Core data types for relgraph.
//!
//! This crate defines the value types every other relgraph crate works with:
//! project and artifact coordinates, typed relationship edges, dependency
//! scopes and their transitivity policies, global configuration, and the
//! TOML graph description format.
//!
//! This crate is intentionally free of graph storage and traversal code.

pub mod config;
pub mod coordinate;
pub mod graph_file;
pub mod relationship;
pub mod scope;
pub mod version;
