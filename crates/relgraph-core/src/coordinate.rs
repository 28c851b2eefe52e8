//! Project and artifact coordinates.

use std::fmt;

use relgraph_util::errors::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};

use crate::version::Version;

/// Unversioned project identity: `group:artifact`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectRef {
    group_id: String,
    artifact_id: String,
}

impl ProjectRef {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// Parse `"group:artifact"`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.split(':').collect::<Vec<_>>().as_slice() {
            [g, a] => Some(Self::new(*g, *a)),
            _ => None,
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn validate(&self) -> GraphResult<()> {
        if self.group_id.trim().is_empty() {
            return Err(invalid(format!("missing groupId in '{self}'")));
        }
        if self.artifact_id.trim().is_empty() {
            return Err(invalid(format!("missing artifactId in '{self}'")));
        }
        Ok(())
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

impl TryFrom<String> for ProjectRef {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s).ok_or_else(|| format!("expected 'group:artifact', got '{s}'"))
    }
}

impl From<ProjectRef> for String {
    fn from(r: ProjectRef) -> Self {
        r.to_string()
    }
}

/// Versioned project identity: `group:artifact:version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectVersionRef {
    project: ProjectRef,
    version: Version,
}

impl ProjectVersionRef {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<Version>,
    ) -> Self {
        Self {
            project: ProjectRef::new(group_id, artifact_id),
            version: version.into(),
        }
    }

    /// Parse `"group:artifact:version"` into coordinates.
    pub fn parse(s: &str) -> Option<Self> {
        match s.split(':').collect::<Vec<_>>().as_slice() {
            [g, a, v] => Some(Self::new(*g, *a, *v)),
            _ => None,
        }
    }

    pub fn group_id(&self) -> &str {
        self.project.group_id()
    }

    pub fn artifact_id(&self) -> &str {
        self.project.artifact_id()
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Storage key that agrees with equality (`1.0` and `1.0.0` share one key).
    pub fn key(&self) -> String {
        format!("{}:{}", self.project, self.version.canonical())
    }

    /// The unversioned identity of this project.
    pub fn project_ref(&self) -> &ProjectRef {
        &self.project
    }

    pub fn validate(&self) -> GraphResult<()> {
        self.project.validate()?;
        if self.version.is_empty() {
            return Err(invalid(format!("missing version in '{self}'")));
        }
        Ok(())
    }
}

impl fmt::Display for ProjectVersionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.project, self.version)
    }
}

impl TryFrom<String> for ProjectVersionRef {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s).ok_or_else(|| format!("expected 'group:artifact:version', got '{s}'"))
    }
}

impl From<ProjectVersionRef> for String {
    fn from(r: ProjectVersionRef) -> Self {
        r.to_string()
    }
}

/// A concrete artifact produced by a project version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactRef {
    coordinate: ProjectVersionRef,
    #[serde(rename = "type", default = "default_artifact_type")]
    artifact_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    classifier: Option<String>,
    #[serde(default)]
    optional: bool,
}

fn default_artifact_type() -> String {
    "jar".to_string()
}

impl ArtifactRef {
    pub fn new(
        coordinate: ProjectVersionRef,
        artifact_type: impl Into<String>,
        classifier: Option<String>,
        optional: bool,
    ) -> Self {
        Self {
            coordinate,
            artifact_type: artifact_type.into(),
            classifier,
            optional,
        }
    }

    /// Parse `"group:artifact:version[:type[:classifier]]"`.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let (coord, rest) = match parts.as_slice() {
            [g, a, v, rest @ ..] if rest.len() <= 2 => (ProjectVersionRef::new(*g, *a, *v), rest),
            _ => return None,
        };
        let artifact_type = rest.first().copied().unwrap_or("jar");
        let classifier = rest.get(1).map(|c| c.to_string());
        Some(Self::new(coord, artifact_type, classifier, false))
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn coordinate(&self) -> &ProjectVersionRef {
        &self.coordinate
    }

    pub fn artifact_type(&self) -> &str {
        &self.artifact_type
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

impl From<ProjectVersionRef> for ArtifactRef {
    fn from(coordinate: ProjectVersionRef) -> Self {
        Self::new(coordinate, default_artifact_type(), None, false)
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.coordinate, self.artifact_type)?;
        if let Some(ref c) = self.classifier {
            write!(f, ":{c}")?;
        }
        Ok(())
    }
}

fn invalid(message: String) -> GraphError {
    GraphError::InvalidRelationship { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_ref_equality_uses_all_fields() {
        let a = ProjectVersionRef::new("org.a", "a", "1.0");
        assert_eq!(a, ProjectVersionRef::new("org.a", "a", "1.0"));
        assert_ne!(a, ProjectVersionRef::new("org.a", "a", "1.1"));
        assert_ne!(a, ProjectVersionRef::new("org.b", "a", "1.0"));
        assert_eq!(a.project_ref(), &ProjectRef::new("org.a", "a"));
    }

    #[test]
    fn artifact_parse_with_type_and_classifier() {
        let art = ArtifactRef::parse("org.a:a:1.0:test-jar:tests").unwrap();
        assert_eq!(art.artifact_type(), "test-jar");
        assert_eq!(art.classifier(), Some("tests"));
        assert!(!art.is_optional());
        assert_eq!(art.to_string(), "org.a:a:1.0:test-jar:tests");
    }

    #[test]
    fn artifact_parse_defaults_to_jar() {
        let art = ArtifactRef::parse("org.a:a:1.0").unwrap();
        assert_eq!(art.artifact_type(), "jar");
        assert!(art.classifier().is_none());
    }

    #[test]
    fn artifact_parse_rejects_too_many_parts() {
        assert!(ArtifactRef::parse("g:a:v:t:c:extra").is_none());
        assert!(ArtifactRef::parse("g:a").is_none());
    }

    #[test]
    fn validate_rejects_missing_fields() {
        assert!(ProjectVersionRef::new("", "a", "1").validate().is_err());
        assert!(ProjectVersionRef::new("g", " ", "1").validate().is_err());
        assert!(ProjectVersionRef::new("g", "a", "").validate().is_err());
        assert!(ProjectVersionRef::new("g", "a", "1").validate().is_ok());
    }
}
