//! Dependency scopes and the policies that carry them across transitive edges.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maven-compatible dependency scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    Provided,
    Compile,
    Runtime,
    System,
    Test,
}

impl Default for DependencyScope {
    fn default() -> Self {
        Self::Compile
    }
}

impl DependencyScope {
    pub const ALL: [DependencyScope; 5] = [
        Self::Provided,
        Self::Compile,
        Self::Runtime,
        Self::System,
        Self::Test,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Provided => "provided",
            Self::Compile => "compile",
            Self::Runtime => "runtime",
            Self::System => "system",
            Self::Test => "test",
        }
    }

    /// Look up a scope by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// Scopes this scope implies, not including itself.
    pub fn implied(self) -> &'static [DependencyScope] {
        match self {
            Self::Test => &[Self::Provided, Self::Compile, Self::Runtime, Self::System],
            Self::Runtime => &[Self::Compile],
            Self::Compile => &[Self::Provided],
            Self::Provided | Self::System => &[],
        }
    }

    /// Whether an edge declared at `other` is visible under this scope.
    pub fn implies(self, other: DependencyScope) -> bool {
        self == other || self.implied().contains(&other)
    }

    /// Scopes supplied by the build environment rather than packaged with the
    /// project. These keep their scope across transitive edges.
    pub fn is_environment_supplied(self) -> bool {
        matches!(self, Self::System)
    }
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Policy deciding the scope used below a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeTransitivity {
    /// Maven semantics: `provided` stops dependency descent, environment
    /// scopes pass through, everything else narrows to `runtime`.
    #[default]
    Narrowing,
    /// Scope never changes while descending.
    Passthrough,
}

impl ScopeTransitivity {
    /// Scope applied to the children of an edge at `scope`.
    ///
    /// `None` means no dependency edges are followed below it.
    pub fn child_scope_for(self, scope: DependencyScope) -> Option<DependencyScope> {
        match self {
            Self::Passthrough => Some(scope),
            Self::Narrowing => match scope {
                DependencyScope::Provided => None,
                s if s.is_environment_supplied() => Some(s),
                _ => Some(DependencyScope::Runtime),
            },
        }
    }

    /// Look up a policy by name. `maven` and `all` are accepted aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "narrowing" | "maven" => Some(Self::Narrowing),
            "passthrough" | "all" => Some(Self::Passthrough),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implied_sets_match_maven() {
        use DependencyScope::*;
        assert!(Test.implies(Provided));
        assert!(Test.implies(Compile));
        assert!(Test.implies(Runtime));
        assert!(Test.implies(System));
        assert!(Runtime.implies(Compile));
        assert!(!Runtime.implies(Test));
        assert!(Compile.implies(Provided));
        assert!(!Compile.implies(Runtime));
        assert!(Provided.implied().is_empty());
        assert!(System.implied().is_empty());
    }

    #[test]
    fn every_scope_implies_itself() {
        for s in DependencyScope::ALL {
            assert!(s.implies(s), "{s} should imply itself");
        }
    }

    #[test]
    fn narrowing_blocks_provided_and_narrows_compile() {
        let t = ScopeTransitivity::Narrowing;
        assert_eq!(t.child_scope_for(DependencyScope::Provided), None);
        assert_eq!(
            t.child_scope_for(DependencyScope::Compile),
            Some(DependencyScope::Runtime)
        );
        assert_eq!(
            t.child_scope_for(DependencyScope::Test),
            Some(DependencyScope::Runtime)
        );
        assert_eq!(
            t.child_scope_for(DependencyScope::System),
            Some(DependencyScope::System)
        );
    }

    #[test]
    fn passthrough_keeps_scope() {
        for s in DependencyScope::ALL {
            assert_eq!(ScopeTransitivity::Passthrough.child_scope_for(s), Some(s));
        }
    }

    #[test]
    fn unknown_names_resolve_to_none() {
        assert_eq!(DependencyScope::from_name("import"), None);
        assert_eq!(ScopeTransitivity::from_name("sideways"), None);
        assert_eq!(
            DependencyScope::from_name("RUNTIME"),
            Some(DependencyScope::Runtime)
        );
        assert_eq!(
            ScopeTransitivity::from_name("maven"),
            Some(ScopeTransitivity::Narrowing)
        );
    }
}
