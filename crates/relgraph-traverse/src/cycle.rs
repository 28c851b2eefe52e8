//! Cycle recording.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use relgraph_core::coordinate::ProjectRef;
use relgraph_core::relationship::Relationship;

/// A closed path of relationships.
///
/// Two cycles are equal when they cover the same set of projects, whatever
/// edges or starting point were used to find them.
#[derive(Debug, Clone, Serialize)]
pub struct Cycle {
    projects: BTreeSet<ProjectRef>,
    edges: Vec<Relationship>,
}

impl Cycle {
    /// Build a cycle from the edges of a closed path, in traversal order.
    pub fn from_edges(edges: Vec<Relationship>) -> Self {
        let projects = edges
            .iter()
            .flat_map(|e| [e.declaring().project_ref(), e.target().project_ref()])
            .cloned()
            .collect();
        Self { projects, edges }
    }

    pub fn projects(&self) -> &BTreeSet<ProjectRef> {
        &self.projects
    }

    pub fn edges(&self) -> &[Relationship] {
        &self.edges
    }

    pub fn contains(&self, project: &ProjectRef) -> bool {
        self.projects.contains(project)
    }

    /// The edge that closed the path when the cycle was found.
    pub fn closing_edge(&self) -> Option<&Relationship> {
        self.edges.last()
    }
}

impl PartialEq for Cycle {
    fn eq(&self, other: &Self) -> bool {
        self.projects == other.projects
    }
}

impl Eq for Cycle {}

impl Hash for Cycle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.projects.hash(state);
    }
}

impl Ord for Cycle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.projects.cmp(&other.projects)
    }
}

impl PartialOrd for Cycle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.edges.first() else {
            return write!(f, "(empty cycle)");
        };
        write!(f, "{}", first.declaring().project_ref())?;
        for edge in &self.edges {
            write!(f, " -> {}", edge.target().project_ref())?;
        }
        Ok(())
    }
}

/// Collects cycles reported by a traversal, one per distinct project set.
///
/// The detector only records; it never removes edges from anything.
#[derive(Debug, Default, Clone)]
pub struct CycleDetector {
    cycles: BTreeMap<BTreeSet<ProjectRef>, Cycle>,
}

impl CycleDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the closed path `segment`. Returns the stored cycle and whether
    /// it was new; a repeat detection keeps the first edge sequence.
    pub fn record(&mut self, segment: Vec<Relationship>) -> (&Cycle, bool) {
        let cycle = Cycle::from_edges(segment);
        let mut added = false;
        let stored = self
            .cycles
            .entry(cycle.projects.clone())
            .or_insert_with(|| {
                added = true;
                cycle
            });
        (stored, added)
    }

    pub fn cycles_involving(&self, project: &ProjectRef) -> Vec<&Cycle> {
        self.cycles.values().filter(|c| c.contains(project)).collect()
    }

    pub fn all_cycles(&self) -> impl Iterator<Item = &Cycle> {
        self.cycles.values()
    }

    pub fn into_cycles(self) -> BTreeSet<Cycle> {
        self.cycles.into_values().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }
}

impl fmt::Display for CycleDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cycles.is_empty() {
            return write!(f, "No cycles.");
        }
        writeln!(f, "Cycles ({}):", self.cycles.len())?;
        for cycle in self.cycles.values() {
            writeln!(f, "  {cycle}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgraph_core::coordinate::ProjectVersionRef;
    use relgraph_core::scope::DependencyScope;

    fn dep(from: &str, to: &str) -> Relationship {
        Relationship::dependency(
            ProjectVersionRef::parse(from).unwrap(),
            ProjectVersionRef::parse(to).unwrap(),
            DependencyScope::Compile,
            0,
        )
    }

    #[test]
    fn same_project_set_collapses() {
        let mut detector = CycleDetector::new();
        let (_, first) = detector.record(vec![
            dep("g:a:1", "g:b:1"),
            dep("g:b:1", "g:c:1"),
            dep("g:c:1", "g:a:1"),
        ]);
        let (stored, second) = detector.record(vec![
            dep("g:b:1", "g:c:1"),
            dep("g:c:1", "g:a:1"),
            dep("g:a:1", "g:b:1"),
        ]);
        assert!(first);
        assert!(!second);
        assert_eq!(stored.to_string(), "g:a -> g:b -> g:c -> g:a");
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn queries_by_project() {
        let mut detector = CycleDetector::new();
        detector.record(vec![dep("g:a:1", "g:b:1"), dep("g:b:1", "g:a:1")]);
        detector.record(vec![dep("g:c:1", "g:c:1")]);
        assert_eq!(detector.cycles_involving(&ProjectRef::new("g", "a")).len(), 1);
        assert_eq!(detector.cycles_involving(&ProjectRef::new("g", "c")).len(), 1);
        assert!(detector
            .cycles_involving(&ProjectRef::new("g", "z"))
            .is_empty());
        assert_eq!(detector.all_cycles().count(), 2);
    }

    #[test]
    fn report_text() {
        let mut detector = CycleDetector::new();
        assert_eq!(detector.to_string(), "No cycles.");
        detector.record(vec![dep("g:c:1", "g:c:1")]);
        assert_eq!(detector.to_string(), "Cycles (1):\n  g:c -> g:c\n");
    }
}
