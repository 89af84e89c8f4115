//! Project file serialization

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::PROJECT_VERSION;
use crate::node::SceneNode;
use crate::scene::SceneGraph;

fn default_name() -> String {
    "Untitled".to_string()
}

fn default_version() -> String {
    PROJECT_VERSION.to_string()
}

/// On-disk document layout
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProjectData {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default = "default_version")]
    version: String,
    objects: Vec<SceneNode>,
}

/// Serialization format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectFormat {
    /// Pretty-printed RON
    #[default]
    Ron,
    /// Pretty-printed JSON
    Json,
}

impl ProjectFormat {
    /// `.json` files use JSON, everything else RON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ProjectFormat::Json,
            _ => ProjectFormat::Ron,
        }
    }
}

/// A named scene document
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    /// Project name
    pub name: String,
    /// Document format version
    pub version: String,
    graph: SceneGraph,
}

impl From<ProjectData> for Project {
    fn from(data: ProjectData) -> Self {
        Self {
            name: data.name,
            version: data.version,
            graph: SceneGraph::from_objects(data.objects),
        }
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new(default_name())
    }
}

impl Project {
    /// Create a new empty project
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_graph(name, SceneGraph::new())
    }

    /// Wrap an existing scene
    pub fn from_graph(name: impl Into<String>, graph: SceneGraph) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            graph,
        }
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn into_graph(self) -> SceneGraph {
        self.graph
    }

    /// Save project to a file, picking the format from the extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        let path = path.as_ref();
        let content = self.to_bytes(ProjectFormat::from_path(path))?;
        std::fs::write(path, content).map_err(|e| ProjectError::Io(e.to_string()))?;
        tracing::info!("Saved project '{}' to {}", self.name, path.display());
        Ok(())
    }

    /// Serialize project to bytes
    pub fn to_bytes(&self, format: ProjectFormat) -> Result<Vec<u8>, ProjectError> {
        #[derive(Serialize)]
        struct Document<'a> {
            name: &'a str,
            version: &'a str,
            objects: &'a [SceneNode],
        }
        let document = Document {
            name: &self.name,
            version: &self.version,
            objects: self.graph.objects(),
        };

        let content = match format {
            ProjectFormat::Ron => {
                ron::ser::to_string_pretty(&document, ron::ser::PrettyConfig::default())
                    .map_err(|e| ProjectError::Serialize(e.to_string()))?
            }
            ProjectFormat::Json => serde_json::to_string_pretty(&document)
                .map_err(|e| ProjectError::Serialize(e.to_string()))?,
        };
        Ok(content.into_bytes())
    }

    /// Load project from a file, picking the format from the extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|e| ProjectError::Io(e.to_string()))?;
        let project = Self::load_from_bytes(&content, ProjectFormat::from_path(path))?;
        tracing::info!(
            "Loaded project '{}' ({} nodes) from {}",
            project.name,
            project.graph.len(),
            path.display()
        );
        Ok(project)
    }

    /// Load project from bytes
    pub fn load_from_bytes(data: &[u8], format: ProjectFormat) -> Result<Self, ProjectError> {
        let data: ProjectData = match format {
            ProjectFormat::Ron => {
                let content = std::str::from_utf8(data)
                    .map_err(|e| ProjectError::Deserialize(e.to_string()))?;
                ron::from_str(content).map_err(|e| ProjectError::Deserialize(e.to_string()))?
            }
            ProjectFormat::Json => serde_json::from_slice(data)
                .map_err(|e| ProjectError::Deserialize(e.to_string()))?,
        };

        let project = Project::from(data);
        let mut seen = HashSet::new();
        if let Some(id) = project.graph.ids().into_iter().find(|id| !seen.insert(*id)) {
            return Err(ProjectError::Deserialize(format!(
                "node id {} appears more than once",
                id
            )));
        }
        Ok(project)
    }
}

/// Project-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProjectError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}
