//! Typed relationship edges between project coordinates.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use relgraph_util::errors::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};

use crate::coordinate::{ArtifactRef, ProjectRef, ProjectVersionRef};
use crate::scope::DependencyScope;

/// The kind of link a relationship represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipType {
    Parent,
    Dependency,
    Plugin,
    PluginDependency,
    Extension,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 5] = [
        Self::Parent,
        Self::Dependency,
        Self::Plugin,
        Self::PluginDependency,
        Self::Extension,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Dependency => "dependency",
            Self::Plugin => "plugin",
            Self::PluginDependency => "plugin-dependency",
            Self::Extension => "extension",
        }
    }

    /// Alternative spellings accepted by [`RelationshipType::from_alias`].
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Parent => &["parent", "parents"],
            Self::Dependency => &["dependency", "dependencies", "dep", "deps"],
            Self::Plugin => &["plugin", "plugins"],
            Self::PluginDependency => &[
                "plugin-dependency",
                "plugin-dependencies",
                "plugin_dependency",
                "plugin-dep",
                "plugin-level-dependency",
            ],
            Self::Extension => &["extension", "extensions", "ext"],
        }
    }

    /// Case-insensitive alias lookup. Unknown aliases are `None`, never an error.
    pub fn from_alias(alias: &str) -> Option<Self> {
        let alias = alias.trim();
        Self::ALL.into_iter().find(|t| {
            t.aliases()
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(alias))
        })
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-type payload of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RelationshipKind {
    Parent {
        target: ProjectVersionRef,
    },
    Dependency {
        target: ArtifactRef,
        scope: DependencyScope,
        #[serde(default)]
        managed: bool,
    },
    Plugin {
        target: ProjectVersionRef,
        #[serde(default)]
        managed: bool,
        #[serde(default)]
        reporting: bool,
    },
    PluginDependency {
        plugin: ProjectRef,
        target: ArtifactRef,
        #[serde(default)]
        managed: bool,
    },
    Extension {
        target: ProjectVersionRef,
    },
}

impl RelationshipKind {
    pub fn rel_type(&self) -> RelationshipType {
        match self {
            Self::Parent { .. } => RelationshipType::Parent,
            Self::Dependency { .. } => RelationshipType::Dependency,
            Self::Plugin { .. } => RelationshipType::Plugin,
            Self::PluginDependency { .. } => RelationshipType::PluginDependency,
            Self::Extension { .. } => RelationshipType::Extension,
        }
    }
}

/// A directed, typed edge from a declaring project to a target.
///
/// Identity is `(declaring, target, type, index)`: two relationships that agree
/// on those are the same edge even if their payload flags differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    declaring: ProjectVersionRef,
    #[serde(default)]
    index: u32,
    #[serde(flatten)]
    kind: RelationshipKind,
}

impl Relationship {
    pub fn new(declaring: ProjectVersionRef, index: u32, kind: RelationshipKind) -> Self {
        Self {
            declaring,
            index,
            kind,
        }
    }

    pub fn parent(declaring: ProjectVersionRef, target: ProjectVersionRef) -> Self {
        Self::new(declaring, 0, RelationshipKind::Parent { target })
    }

    pub fn dependency(
        declaring: ProjectVersionRef,
        target: impl Into<ArtifactRef>,
        scope: DependencyScope,
        index: u32,
    ) -> Self {
        Self::new(
            declaring,
            index,
            RelationshipKind::Dependency {
                target: target.into(),
                scope,
                managed: false,
            },
        )
    }

    pub fn plugin(declaring: ProjectVersionRef, target: ProjectVersionRef, index: u32) -> Self {
        Self::new(
            declaring,
            index,
            RelationshipKind::Plugin {
                target,
                managed: false,
                reporting: false,
            },
        )
    }

    pub fn plugin_dependency(
        declaring: ProjectVersionRef,
        plugin: ProjectRef,
        target: impl Into<ArtifactRef>,
        index: u32,
    ) -> Self {
        Self::new(
            declaring,
            index,
            RelationshipKind::PluginDependency {
                plugin,
                target: target.into(),
                managed: false,
            },
        )
    }

    pub fn extension(declaring: ProjectVersionRef, target: ProjectVersionRef, index: u32) -> Self {
        Self::new(declaring, index, RelationshipKind::Extension { target })
    }

    /// Mark the edge as coming from a management section (only meaningful for
    /// dependency, plugin and plugin-dependency edges).
    pub fn managed(mut self, value: bool) -> Self {
        match &mut self.kind {
            RelationshipKind::Dependency { managed, .. }
            | RelationshipKind::Plugin { managed, .. }
            | RelationshipKind::PluginDependency { managed, .. } => *managed = value,
            RelationshipKind::Parent { .. } | RelationshipKind::Extension { .. } => {}
        }
        self
    }

    pub fn declaring(&self) -> &ProjectVersionRef {
        &self.declaring
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn kind(&self) -> &RelationshipKind {
        &self.kind
    }

    pub fn rel_type(&self) -> RelationshipType {
        self.kind.rel_type()
    }

    /// The project this edge points at.
    pub fn target(&self) -> &ProjectVersionRef {
        match &self.kind {
            RelationshipKind::Parent { target }
            | RelationshipKind::Plugin { target, .. }
            | RelationshipKind::Extension { target } => target,
            RelationshipKind::Dependency { target, .. }
            | RelationshipKind::PluginDependency { target, .. } => target.coordinate(),
        }
    }

    /// The concrete artifact targeted, for edge types that name one.
    pub fn target_artifact(&self) -> Option<&ArtifactRef> {
        match &self.kind {
            RelationshipKind::Dependency { target, .. }
            | RelationshipKind::PluginDependency { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Declared scope, for dependency edges only.
    pub fn scope(&self) -> Option<DependencyScope> {
        match self.kind {
            RelationshipKind::Dependency { scope, .. } => Some(scope),
            _ => None,
        }
    }

    pub fn is_managed(&self) -> bool {
        match self.kind {
            RelationshipKind::Dependency { managed, .. }
            | RelationshipKind::Plugin { managed, .. }
            | RelationshipKind::PluginDependency { managed, .. } => managed,
            RelationshipKind::Parent { .. } | RelationshipKind::Extension { .. } => false,
        }
    }

    pub fn is_optional(&self) -> bool {
        self.target_artifact().is_some_and(ArtifactRef::is_optional)
    }

    pub fn is_self_loop(&self) -> bool {
        self.declaring == *self.target()
    }

    /// Reject edges whose coordinates are missing a group, artifact or version.
    pub fn validate(&self) -> GraphResult<()> {
        self.declaring.validate().map_err(|e| prefixed("declaring", e))?;
        self.target().validate().map_err(|e| prefixed("target", e))?;
        if let RelationshipKind::PluginDependency { plugin, .. } = &self.kind {
            plugin.validate().map_err(|e| prefixed("plugin", e))?;
        }
        Ok(())
    }

    fn identity(&self) -> (&ProjectVersionRef, RelationshipType, u32, &ProjectVersionRef) {
        (&self.declaring, self.rel_type(), self.index, self.target())
    }
}

fn prefixed(what: &str, err: GraphError) -> GraphError {
    match err {
        GraphError::InvalidRelationship { message } => GraphError::InvalidRelationship {
            message: format!("{what}: {message}"),
        },
        other => other,
    }
}

impl PartialEq for Relationship {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Relationship {}

impl Hash for Relationship {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl Ord for Relationship {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl PartialOrd for Relationship {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -[{}#{}]-> {}",
            self.declaring,
            self.rel_type(),
            self.index,
            self.target()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pvr(s: &str) -> ProjectVersionRef {
        ProjectVersionRef::parse(s).unwrap()
    }

    #[test]
    fn alias_lookup_is_case_insensitive() {
        assert_eq!(
            RelationshipType::from_alias("DEPS"),
            Some(RelationshipType::Dependency)
        );
        assert_eq!(
            RelationshipType::from_alias("plugin_dependency"),
            Some(RelationshipType::PluginDependency)
        );
        assert_eq!(RelationshipType::from_alias("bom"), None);
    }

    #[test]
    fn canonical_name_is_an_alias() {
        for t in RelationshipType::ALL {
            assert_eq!(RelationshipType::from_alias(t.name()), Some(t));
        }
    }

    #[test]
    fn identity_ignores_payload_flags() {
        let a = Relationship::dependency(
            pvr("org.a:a:1"),
            pvr("org.b:b:1"),
            DependencyScope::Compile,
            0,
        );
        let b = Relationship::dependency(pvr("org.a:a:1"), pvr("org.b:b:1"), DependencyScope::Test, 0)
            .managed(true);
        assert_eq!(a, b);

        let c = Relationship::dependency(
            pvr("org.a:a:1"),
            pvr("org.b:b:1"),
            DependencyScope::Compile,
            1,
        );
        assert_ne!(a, c);
    }

    #[test]
    fn same_endpoints_different_type_are_distinct() {
        let dep = Relationship::dependency(
            pvr("org.a:a:1"),
            pvr("org.b:b:1"),
            DependencyScope::Compile,
            0,
        );
        let parent = Relationship::parent(pvr("org.a:a:1"), pvr("org.b:b:1"));
        assert_ne!(dep, parent);
        assert!(parent < dep);
    }

    #[test]
    fn self_parent_is_self_loop() {
        let rel = Relationship::parent(pvr("org.a:a:1"), pvr("org.a:a:1"));
        assert!(rel.is_self_loop());
    }

    #[test]
    fn validate_names_the_bad_endpoint() {
        let rel = Relationship::parent(pvr("org.a:a:1"), ProjectVersionRef::new("org.b", "b", ""));
        let err = rel.validate().unwrap_err();
        assert!(err.to_string().contains("target: missing version"), "{err}");
    }

    #[test]
    fn managed_flag_only_applies_to_managed_kinds() {
        let ext = Relationship::extension(pvr("org.a:a:1"), pvr("org.x:x:1"), 0).managed(true);
        assert!(!ext.is_managed());
        let plugin = Relationship::plugin(pvr("org.a:a:1"), pvr("org.p:p:1"), 0).managed(true);
        assert!(plugin.is_managed());
    }
}
