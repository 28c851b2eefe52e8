//! Shared utilities for relgraph.
//!
//! This crate provides the cross-cutting error type used by every other
//! relgraph crate.

pub mod errors;
