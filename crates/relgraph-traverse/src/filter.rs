//! Edge filters and scope transitivity during descent.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use relgraph_core::config::TraversalConfig;
use relgraph_core::relationship::{Relationship, RelationshipType};
use relgraph_core::scope::{DependencyScope, ScopeTransitivity};

/// Extra acceptance test over `(edge, depth)`.
pub type EdgePredicate = Arc<dyn Fn(&Relationship, usize) -> bool + Send + Sync>;

/// Scope state for DEPENDENCY edges at the current descent position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScopeRule {
    /// `None` once a `provided` edge has been crossed under narrowing.
    threshold: Option<DependencyScope>,
    transitivity: ScopeTransitivity,
}

impl ScopeRule {
    fn accepts(&self, scope: DependencyScope) -> bool {
        self.threshold.is_some_and(|t| t.implies(scope))
    }

    fn below(&self, scope: DependencyScope) -> Self {
        Self {
            threshold: self.transitivity.child_scope_for(scope),
            transitivity: self.transitivity,
        }
    }
}

/// The part of a filter that changes during descent.
///
/// Two positions with equal scope states accept exactly the same edges, so a
/// visitor can key "already expanded" on `(project, ScopeState)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeState(Vec<Option<DependencyScope>>);

/// Decides which edges a traversal accepts and what applies beneath them.
///
/// Filters are immutable values: [`child_filter`](Self::child_filter) returns a
/// new filter rather than changing this one, so a filter can be reused across
/// any number of traversals.
#[derive(Clone)]
pub struct RelationshipFilter {
    types: BTreeSet<RelationshipType>,
    rules: Vec<ScopeRule>,
    predicates: Vec<EdgePredicate>,
}

impl RelationshipFilter {
    pub fn new(
        types: impl IntoIterator<Item = RelationshipType>,
        scope: DependencyScope,
        transitivity: ScopeTransitivity,
    ) -> Self {
        Self {
            types: types.into_iter().collect(),
            rules: vec![ScopeRule {
                threshold: Some(scope),
                transitivity,
            }],
            predicates: Vec::new(),
        }
    }

    /// Every relationship type, every dependency scope, narrowing transitivity.
    pub fn any() -> Self {
        Self::new(
            RelationshipType::ALL,
            DependencyScope::Test,
            ScopeTransitivity::Narrowing,
        )
    }

    pub fn dependencies_only(scope: DependencyScope) -> Self {
        Self::new(
            [RelationshipType::Dependency],
            scope,
            ScopeTransitivity::Narrowing,
        )
    }

    pub fn parents_only() -> Self {
        Self::new(
            [RelationshipType::Parent],
            DependencyScope::Test,
            ScopeTransitivity::Narrowing,
        )
    }

    /// Parents, plugins, plugin dependencies and extensions: everything that
    /// shapes how a project is built rather than what it links against.
    pub fn structural() -> Self {
        Self::new(
            [
                RelationshipType::Parent,
                RelationshipType::Plugin,
                RelationshipType::PluginDependency,
                RelationshipType::Extension,
            ],
            DependencyScope::Test,
            ScopeTransitivity::Narrowing,
        )
    }

    /// Build a filter from the `[traversal]` config section.
    pub fn from_config(config: &TraversalConfig) -> Self {
        let mut filter = Self::new(
            config.relationship_types(),
            config.scope_threshold(),
            config.transitivity,
        );
        if !config.include_managed {
            filter = filter.excluding_managed();
        }
        if !config.include_optional {
            filter = filter.excluding_optional_below(1);
        }
        filter
    }

    /// Replace the transitivity of every scope rule.
    pub fn with_transitivity(mut self, transitivity: ScopeTransitivity) -> Self {
        for rule in &mut self.rules {
            rule.transitivity = transitivity;
        }
        self
    }

    pub fn with_predicate(
        mut self,
        predicate: impl Fn(&Relationship, usize) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// Reject edges that only exist in a management section.
    pub fn excluding_managed(self) -> Self {
        self.with_predicate(|rel, _| !rel.is_managed())
    }

    /// Reject optional edges deeper than `depth`. Root edges are depth 1.
    pub fn excluding_optional_below(self, depth: usize) -> Self {
        self.with_predicate(move |rel, d| d <= depth || !rel.is_optional())
    }

    /// Conjunction: an edge is accepted only if both filters accept it.
    pub fn and(mut self, other: RelationshipFilter) -> Self {
        self.types.retain(|t| other.types.contains(t));
        self.rules.extend(other.rules);
        self.predicates.extend(other.predicates);
        self
    }

    pub fn scope_state(&self) -> ScopeState {
        ScopeState(self.rules.iter().map(|r| r.threshold).collect())
    }

    pub fn types(&self) -> &BTreeSet<RelationshipType> {
        &self.types
    }

    /// Whether dependency edges can still be accepted here.
    pub fn follows_dependencies(&self) -> bool {
        self.types.contains(&RelationshipType::Dependency)
            && self.rules.iter().all(|r| r.threshold.is_some())
    }

    /// Whether `rel`, reached at `depth`, belongs in the result.
    pub fn accepts(&self, rel: &Relationship, depth: usize) -> bool {
        if !self.types.contains(&rel.rel_type()) {
            return false;
        }
        if let Some(scope) = rel.scope() {
            if !self.rules.iter().all(|r| r.accepts(scope)) {
                return false;
            }
        }
        self.predicates.iter().all(|p| p(rel, depth))
    }

    /// The filter applied to the target's own edges, or `None` when nothing
    /// below `rel` could be accepted.
    pub fn child_filter(&self, rel: &Relationship) -> Option<RelationshipFilter> {
        let Some(scope) = rel.scope() else {
            return Some(self.clone());
        };
        let child = RelationshipFilter {
            types: self.types.clone(),
            rules: self.rules.iter().map(|r| r.below(scope)).collect(),
            predicates: self.predicates.clone(),
        };
        let has_other_types = child
            .types
            .iter()
            .any(|t| *t != RelationshipType::Dependency);
        if child.follows_dependencies() || has_other_types {
            Some(child)
        } else {
            None
        }
    }
}

impl Default for RelationshipFilter {
    fn default() -> Self {
        Self::any()
    }
}

impl fmt::Debug for RelationshipFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipFilter")
            .field("types", &self.types)
            .field("rules", &self.rules)
            .field("predicates", &self.predicates.len())
            .finish()
    }
}
