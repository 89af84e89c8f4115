//! Forge core: scene model, transforms, booleans and history
//!
//! This crate provides:
//! - Scene nodes and the scene graph forest
//! - Geometry realization for primitives and custom meshes
//! - Transform composition, world placement and group re-basing
//! - The boolean engine built on `forge-csg`
//! - Undo/redo history and the [`Editor`] command layer
//! - Project files (RON/JSON) and STL interchange

pub mod boolean;
pub mod config;
pub mod constants;
pub mod editor;
pub mod export;
pub mod history;
pub mod id;
pub mod import;
pub mod mesh;
pub mod node;
pub mod primitive;
pub mod project;
pub mod realize;
pub mod scene;
pub mod transform;
pub mod worker;

pub use boolean::{
    BooleanError, BooleanJob, BooleanType, combine, combine_with, prepare, prepare_nested,
};
pub use config::{ConfigError, EngineConfig, HistoryConfig, TessellationConfig};
pub use editor::{Editor, EditorError};
pub use export::world_meshes;
pub use history::History;
pub use id::NodeId;
pub use import::import_mesh;
pub use mesh::stl::{StlError, load_stl, save_stl};
pub use mesh::{Aabb, GeometryError, Mesh};
pub use node::{NodeKind, NodePatch, PrimitiveKind, SceneNode, Shape};
pub use project::{Project, ProjectError, ProjectFormat};
pub use realize::{realize, realize_with};
pub use scene::{GraphError, SceneGraph};
pub use transform::{Transform, compose, decompose, effective_scale, world_place, world_place_with};
