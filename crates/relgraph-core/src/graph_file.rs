use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use relgraph_util::errors::{GraphError, GraphResult};

use crate::coordinate::{ArtifactRef, ProjectRef, ProjectVersionRef};
use crate::relationship::{Relationship, RelationshipKind, RelationshipType};
use crate::scope::DependencyScope;

/// A TOML description of a relationship graph.
///
/// ```toml
/// [[relationship]]
/// declaring = "org.example:app:1.0"
/// type = "dependency"
/// target = "org.example:lib:1.0"
/// scope = "compile"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphFile {
    #[serde(default)]
    pub relationship: Vec<RelationshipEntry>,
}

/// One `[[relationship]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RelationshipEntry {
    pub declaring: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub target: String,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub scope: Option<DependencyScope>,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub reporting: bool,
    /// Owning plugin (`group:artifact`) of a plugin-dependency.
    #[serde(default)]
    pub plugin: Option<String>,
    #[serde(default)]
    pub artifact_type: Option<String>,
    #[serde(default)]
    pub classifier: Option<String>,
}

impl GraphFile {
    /// Load and parse a graph description from the given path.
    pub fn from_path(path: &Path) -> GraphResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GraphError::GraphFile {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse_toml(&content)
    }

    pub fn parse_toml(content: &str) -> GraphResult<Self> {
        toml::from_str(content).map_err(|e| GraphError::GraphFile {
            message: format!("Failed to parse graph file: {e}"),
        })
    }

    /// Convert every entry into a relationship.
    ///
    /// Entries without an explicit `index` are numbered in file order among
    /// siblings sharing the same declaring project and type. Two entries may
    /// not end up with the same declaring project, type and index.
    pub fn into_relationships(self) -> GraphResult<Vec<Relationship>> {
        let mut next_index: HashMap<(ProjectVersionRef, RelationshipType), u32> = HashMap::new();
        let mut used: HashMap<(ProjectVersionRef, RelationshipType, u32), usize> = HashMap::new();
        let mut rels = Vec::with_capacity(self.relationship.len());

        for (pos, entry) in self.relationship.into_iter().enumerate() {
            let rel_type = RelationshipType::from_alias(&entry.rel_type).ok_or_else(|| {
                entry_error(pos, format!("unknown relationship type '{}'", entry.rel_type))
            })?;
            let declaring = parse_coordinate(pos, "declaring", &entry.declaring)?;
            let target = parse_coordinate(pos, "target", &entry.target)?;

            let counter = next_index
                .entry((declaring.clone(), rel_type))
                .or_insert(0);
            let index = entry.index.unwrap_or(*counter);
            *counter = (*counter).max(index.saturating_add(1));
            if let Some(first) = used.insert((declaring.clone(), rel_type, index), pos) {
                return Err(entry_error(
                    pos,
                    format!(
                        "index {index} of {rel_type} relationships declared by {declaring} is \
                         already used by relationship #{}",
                        first + 1
                    ),
                ));
            }

            let kind = match rel_type {
                RelationshipType::Parent => RelationshipKind::Parent { target },
                RelationshipType::Dependency => RelationshipKind::Dependency {
                    target: entry.artifact(target),
                    scope: entry.scope.unwrap_or_default(),
                    managed: entry.managed,
                },
                RelationshipType::Plugin => RelationshipKind::Plugin {
                    target,
                    managed: entry.managed,
                    reporting: entry.reporting,
                },
                RelationshipType::PluginDependency => {
                    let plugin = entry
                        .plugin
                        .as_deref()
                        .and_then(ProjectRef::parse)
                        .ok_or_else(|| {
                            entry_error(pos, "plugin-dependency needs 'plugin = \"group:artifact\"'")
                        })?;
                    RelationshipKind::PluginDependency {
                        plugin,
                        target: entry.artifact(target),
                        managed: entry.managed,
                    }
                }
                RelationshipType::Extension => RelationshipKind::Extension { target },
            };
            rels.push(Relationship::new(declaring, index, kind));
        }

        Ok(rels)
    }
}

impl RelationshipEntry {
    fn artifact(&self, target: ProjectVersionRef) -> ArtifactRef {
        ArtifactRef::new(
            target,
            self.artifact_type.as_deref().unwrap_or("jar"),
            self.classifier.clone(),
            self.optional,
        )
    }
}

fn parse_coordinate(pos: usize, field: &str, value: &str) -> GraphResult<ProjectVersionRef> {
    ProjectVersionRef::parse(value).ok_or_else(|| {
        entry_error(
            pos,
            format!("{field} '{value}' is not 'group:artifact:version'"),
        )
    })
}

fn entry_error(pos: usize, message: impl std::fmt::Display) -> GraphError {
    GraphError::GraphFile {
        message: format!("relationship #{}: {message}", pos + 1),
    }
}
