//! Relationship graph traversal.
//!
//! A single-threaded, depth-first walker drives [`traversal::TraversalVisitor`]s
//! over any [`relgraph_store::RelationshipGraphStore`]. Each edge passes
//! through a [`filter::RelationshipFilter`] that also computes the filter
//! used below it, which is how dependency scopes narrow while descending.
//! Revisiting a node on the active path is recorded as a cycle, never an error.

pub mod ancestry;
pub mod build_order;
pub mod cycle;
pub mod dependents;
pub mod filter;
pub mod render;
pub mod traversal;

pub use build_order::{build_order, BuildOrder};
pub use cycle::{Cycle, CycleDetector};
pub use filter::{RelationshipFilter, ScopeState};
pub use traversal::{CancellationToken, Completion, Traversal, TraversalVisitor};
