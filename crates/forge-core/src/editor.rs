//! Editor: the command layer over the scene graph
//!
//! Every mutating command runs on a copy of the graph. When it succeeds the
//! previous graph is pushed onto the history as exactly one undo step; when
//! it fails the graph and history are left untouched.
//!
//! At most one boolean job runs in the background at a time. While it runs
//! the editor refuses every other mutating command with [`EditorError::Busy`].

use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::boolean::{self, BooleanError, BooleanJob, BooleanType};
use crate::config::EngineConfig;
use crate::export::world_meshes;
use crate::history::History;
use crate::id::NodeId;
use crate::import::{import_mesh, name_from_path};
use crate::mesh::stl::{StlError, load_stl, save_stl};
use crate::mesh::{GeometryError, Mesh};
use crate::node::{NodePatch, PrimitiveKind, SceneNode};
use crate::project::{Project, ProjectError};
use crate::scene::{GraphError, SceneGraph, naming};
use crate::worker::{SharedBooleanStatus, create_boolean_status, spawn_boolean, take_finished};

/// Editor command errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum EditorError {
    #[error("A boolean operation is still running")]
    Busy,
    #[error("No boolean operation is pending")]
    NoPendingJob,
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Boolean(#[from] BooleanError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Stl(#[from] StlError),
}

struct PendingBoolean {
    job: Arc<BooleanJob>,
    status: SharedBooleanStatus,
    handle: Option<JoinHandle<()>>,
}

/// Scene editing session
pub struct Editor {
    graph: SceneGraph,
    history: History,
    config: EngineConfig,
    project_name: String,
    pending: Option<PendingBoolean>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Editor {
    /// Create an editor with an empty scene
    pub fn new(config: EngineConfig) -> Self {
        Self::from_project(Project::default(), config)
    }

    /// Create an editor for an existing project
    pub fn from_project(project: Project, config: EngineConfig) -> Self {
        Self {
            project_name: project.name.clone(),
            graph: project.into_graph(),
            history: History::with_limit(config.history.limit),
            config,
            pending: None,
        }
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn set_project_name(&mut self, name: impl Into<String>) {
        self.project_name = name.into();
    }

    /// Check if a boolean job is in flight
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Run `edit` on a copy of the graph and commit it as one undo step
    fn apply<T>(
        &mut self,
        command: &str,
        edit: impl FnOnce(&mut SceneGraph) -> Result<T, EditorError>,
    ) -> Result<T, EditorError> {
        if self.is_busy() {
            return Err(EditorError::Busy);
        }
        let mut next = self.graph.clone();
        match edit(&mut next) {
            Ok(value) => {
                let previous = std::mem::replace(&mut self.graph, next);
                self.history.record(previous);
                tracing::debug!("Committed {}", command);
                Ok(value)
            }
            Err(e) => {
                tracing::warn!("{} failed: {}", command, e);
                Err(e)
            }
        }
    }

    // ============== Node Commands ==============

    /// Add a primitive named `"<Kind> N"` at the origin
    pub fn add_primitive(&mut self, kind: PrimitiveKind) -> Result<NodeId, EditorError> {
        self.add_primitive_named(kind, None)
    }

    /// Add a primitive at the origin, named `name` or `"<Kind> N"` when unset
    pub fn add_primitive_named(
        &mut self,
        kind: PrimitiveKind,
        name: Option<&str>,
    ) -> Result<NodeId, EditorError> {
        self.apply("add primitive", |graph| {
            let name = match name {
                Some(name) => name.to_string(),
                None => naming::indexed_name(kind.display_name(), &graph.names()),
            };
            Ok(graph.add(SceneNode::primitive(kind, name))?)
        })
    }

    /// Add a fully built node to the root list
    pub fn add_node(&mut self, node: SceneNode) -> Result<NodeId, EditorError> {
        self.apply("add node", |graph| Ok(graph.add(node)?))
    }

    /// Add an imported mesh as a custom-mesh node
    pub fn import_mesh(
        &mut self,
        name: impl Into<String>,
        mesh: Mesh,
    ) -> Result<NodeId, EditorError> {
        let name = name.into();
        self.apply("import mesh", |graph| {
            let node = import_mesh(name, mesh)?;
            Ok(graph.add(node)?)
        })
    }

    /// Import an STL file as a custom-mesh node named after the file
    pub fn import_stl(&mut self, path: impl AsRef<Path>) -> Result<NodeId, EditorError> {
        if self.is_busy() {
            return Err(EditorError::Busy);
        }
        let path = path.as_ref();
        let mesh = load_stl(path)?;
        self.import_mesh(name_from_path(path), mesh)
    }

    pub fn update(&mut self, id: NodeId, patch: &NodePatch) -> Result<(), EditorError> {
        self.apply("update", |graph| Ok(graph.update(id, patch)?))
    }

    pub fn delete(&mut self, id: NodeId) -> Result<SceneNode, EditorError> {
        self.apply("delete", |graph| Ok(graph.delete(id)?))
    }

    pub fn duplicate(&mut self, id: NodeId) -> Result<NodeId, EditorError> {
        self.apply("duplicate", |graph| Ok(graph.duplicate(id)?))
    }

    pub fn group(&mut self, ids: &[NodeId]) -> Result<NodeId, EditorError> {
        self.apply("group", |graph| Ok(graph.group(ids)?))
    }

    pub fn ungroup(&mut self, id: NodeId) -> Result<Vec<NodeId>, EditorError> {
        self.apply("ungroup", |graph| Ok(graph.ungroup(id)?))
    }

    // ============== Boolean Commands ==============

    fn prepare_boolean(
        &self,
        a: NodeId,
        b: NodeId,
        op: BooleanType,
    ) -> Result<BooleanJob, EditorError> {
        if self.is_busy() {
            return Err(EditorError::Busy);
        }
        if a == b {
            let reason = "boolean operands must be distinct".to_string();
            return Err(GraphError::InvalidSelection(reason).into());
        }
        let node_a = self.graph.find(a).ok_or(BooleanError::NotFound(a))?;
        let node_b = self.graph.find(b).ok_or(BooleanError::NotFound(b))?;
        let parent_a = self.graph.parent_world(a).ok_or(BooleanError::NotFound(a))?;
        let parent_b = self.graph.parent_world(b).ok_or(BooleanError::NotFound(b))?;
        Ok(boolean::prepare_nested(
            (node_a, &parent_a),
            (node_b, &parent_b),
            op,
            &self.config.tessellation,
        )?)
    }

    /// Replace both operands with the boolean result
    fn commit_boolean(
        &mut self,
        job: &BooleanJob,
        result: Result<forge_csg::TriangleMesh, BooleanError>,
    ) -> Result<NodeId, EditorError> {
        let (a, b) = job.operands();
        self.apply(job.op().display_name(), |graph| {
            let node = job.finish(result?)?;
            Ok(graph.replace_operands(a, b, node)?)
        })
    }

    /// Combine two nodes on the calling thread
    pub fn combine(
        &mut self,
        a: NodeId,
        b: NodeId,
        op: BooleanType,
    ) -> Result<NodeId, EditorError> {
        let job = self.prepare_boolean(a, b, op).inspect_err(|e| {
            tracing::warn!("{} failed: {}", op.display_name(), e);
        })?;
        let result = job.compute();
        self.commit_boolean(&job, result)
    }

    /// Start combining two nodes in the background.
    ///
    /// Collect the result with [`Editor::poll_combine`] or
    /// [`Editor::wait_combine`].
    pub fn begin_combine(
        &mut self,
        a: NodeId,
        b: NodeId,
        op: BooleanType,
    ) -> Result<(), EditorError> {
        let job = Arc::new(self.prepare_boolean(a, b, op)?);
        let status = create_boolean_status();
        let handle = spawn_boolean(job.clone(), status.clone());
        tracing::debug!("Started background {}", op.display_name());
        self.pending = Some(PendingBoolean {
            job,
            status,
            handle: Some(handle),
        });
        Ok(())
    }

    /// Collect a finished background boolean.
    ///
    /// Returns `Ok(None)` while the job is still running.
    pub fn poll_combine(&mut self) -> Result<Option<NodeId>, EditorError> {
        let pending = self.pending.as_ref().ok_or(EditorError::NoPendingJob)?;
        let Some(result) = take_finished(&pending.status) else {
            return Ok(None);
        };

        let Some(mut pending) = self.pending.take() else {
            return Err(EditorError::NoPendingJob);
        };
        if let Some(handle) = pending.handle.take() {
            // The worker has already published, so this returns immediately
            if handle.join().is_err() {
                tracing::warn!("Boolean worker panicked after publishing its result");
                return Err(worker_panicked().into());
            }
        }
        self.commit_boolean(&pending.job, result).map(Some)
    }

    /// Block until the background boolean finishes and collect it
    pub fn wait_combine(&mut self) -> Result<NodeId, EditorError> {
        let pending = self.pending.as_mut().ok_or(EditorError::NoPendingJob)?;
        if let Some(handle) = pending.handle.take() {
            if handle.join().is_err() {
                self.pending = None;
                tracing::warn!("Boolean worker panicked");
                return Err(worker_panicked().into());
            }
        }
        match self.poll_combine()? {
            Some(id) => Ok(id),
            None => {
                self.pending = None;
                let reason = "boolean worker exited without a result".to_string();
                Err(BooleanError::Combinator(reason).into())
            }
        }
    }

    // ============== History ==============

    /// Restore the state before the last command. Returns `false` when there
    /// is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        if self.is_busy() {
            return Err(EditorError::Busy);
        }
        let current = self.graph.clone();
        match self.history.undo(current) {
            Some(previous) => {
                self.graph = previous;
                tracing::debug!("Undo");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Re-apply the last undone command. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> Result<bool, EditorError> {
        if self.is_busy() {
            return Err(EditorError::Busy);
        }
        let current = self.graph.clone();
        match self.history.redo(current) {
            Some(next) => {
                self.graph = next;
                tracing::debug!("Redo");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ============== Files ==============

    /// Replace the scene with a project file and start a fresh history
    pub fn load_project(&mut self, path: impl AsRef<Path>) -> Result<(), EditorError> {
        if self.is_busy() {
            return Err(EditorError::Busy);
        }
        let project = Project::load(path)?;
        self.project_name = project.name.clone();
        self.graph = project.into_graph();
        self.history.clear();
        Ok(())
    }

    /// Save the scene as a project file
    pub fn save_project(&self, path: impl AsRef<Path>) -> Result<(), EditorError> {
        Project::from_graph(self.project_name.clone(), self.graph.clone()).save(path)?;
        Ok(())
    }

    /// Write every leaf, placed in world space, to one binary STL file.
    /// Returns the number of triangles written.
    pub fn export_stl(&self, path: impl AsRef<Path>) -> Result<usize, EditorError> {
        let meshes = world_meshes(self.graph.objects(), &self.config.tessellation)?;
        let count = save_stl(&meshes, path.as_ref())?;
        tracing::info!(
            "Exported {} triangles from {} meshes to {}",
            count,
            meshes.len(),
            path.as_ref().display()
        );
        Ok(count)
    }
}

fn worker_panicked() -> BooleanError {
    BooleanError::Combinator("boolean worker panicked".into())
}
