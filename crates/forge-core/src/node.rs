//! Scene node data model

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_COLOR;
use crate::id::NodeId;
use crate::mesh::Mesh;
use crate::transform::Transform;

/// Built-in solid kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Box,
    Sphere,
    Cylinder,
    Cone,
    Torus,
}

impl PrimitiveKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Box => "Box",
            PrimitiveKind::Sphere => "Sphere",
            PrimitiveKind::Cylinder => "Cylinder",
            PrimitiveKind::Cone => "Cone",
            PrimitiveKind::Torus => "Torus",
        }
    }

    pub fn all() -> &'static [PrimitiveKind] {
        &[
            PrimitiveKind::Box,
            PrimitiveKind::Sphere,
            PrimitiveKind::Cylinder,
            PrimitiveKind::Cone,
            PrimitiveKind::Torus,
        ]
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PrimitiveKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimitiveKind::all()
            .iter()
            .copied()
            .find(|kind| kind.display_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown primitive '{}'", s))
    }
}

/// What a node is, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Primitive(PrimitiveKind),
    Group,
    CustomMesh,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Primitive(kind) => f.write_str(kind.display_name()),
            NodeKind::Group => f.write_str("Group"),
            NodeKind::CustomMesh => f.write_str("Mesh"),
        }
    }
}

/// Shape descriptor. Children only exist on groups and geometry only on
/// custom meshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Box,
    Sphere,
    Cylinder,
    Cone,
    Torus,
    Group { children: Vec<SceneNode> },
    CustomMesh { geometry: Mesh },
}

impl Shape {
    pub fn kind(&self) -> NodeKind {
        match self {
            Shape::Box => NodeKind::Primitive(PrimitiveKind::Box),
            Shape::Sphere => NodeKind::Primitive(PrimitiveKind::Sphere),
            Shape::Cylinder => NodeKind::Primitive(PrimitiveKind::Cylinder),
            Shape::Cone => NodeKind::Primitive(PrimitiveKind::Cone),
            Shape::Torus => NodeKind::Primitive(PrimitiveKind::Torus),
            Shape::Group { .. } => NodeKind::Group,
            Shape::CustomMesh { .. } => NodeKind::CustomMesh,
        }
    }
}

impl From<PrimitiveKind> for Shape {
    fn from(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Box => Shape::Box,
            PrimitiveKind::Sphere => Shape::Sphere,
            PrimitiveKind::Cylinder => Shape::Cylinder,
            PrimitiveKind::Cone => Shape::Cone,
            PrimitiveKind::Torus => Shape::Torus,
        }
    }
}

fn default_color() -> [f32; 4] {
    DEFAULT_COLOR
}

/// A node in the scene forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    id: NodeId,
    pub name: String,
    pub shape: Shape,
    #[serde(default)]
    pub transform: Transform,
    /// Offset applied to realized geometry before the node transform
    #[serde(default)]
    pub pivot: DVec3,
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    /// Natural bounding size before scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dimensions: Option<DVec3>,
}

impl SceneNode {
    /// Create a node with a fresh id, identity transform and default color
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        let base_dimensions = match shape {
            Shape::Group { .. } => None,
            _ => Some(DVec3::ONE),
        };
        Self {
            id: NodeId::new(),
            name: name.into(),
            shape,
            transform: Transform::IDENTITY,
            pivot: DVec3::ZERO,
            color: DEFAULT_COLOR,
            base_dimensions,
        }
    }

    /// Create a primitive node
    pub fn primitive(kind: PrimitiveKind, name: impl Into<String>) -> Self {
        Self::new(name, kind.into())
    }

    /// Create a group owning `children`
    pub fn group(name: impl Into<String>, children: Vec<SceneNode>) -> Self {
        Self::new(name, Shape::Group { children })
    }

    /// Create a custom-mesh node
    pub fn custom_mesh(name: impl Into<String>, geometry: Mesh) -> Self {
        Self::new(name, Shape::CustomMesh { geometry })
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_position(mut self, position: DVec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.shape.kind()
    }

    pub fn is_group(&self) -> bool {
        matches!(self.shape, Shape::Group { .. })
    }

    pub fn children(&self) -> Option<&[SceneNode]> {
        match &self.shape {
            Shape::Group { children } => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<SceneNode>> {
        match &mut self.shape {
            Shape::Group { children } => Some(children),
            _ => None,
        }
    }

    /// Stored mesh of a custom-mesh node
    pub fn geometry(&self) -> Option<&Mesh> {
        match &self.shape {
            Shape::CustomMesh { geometry } => Some(geometry),
            _ => None,
        }
    }

    /// This node's id followed by every descendant id, depth first
    pub fn subtree_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            ids.push(node.id);
            if let Some(children) = node.children() {
                stack.extend(children.iter().rev());
            }
        }
        ids
    }

    /// Deep copy in which this node and every descendant get fresh ids
    pub fn fresh_copy(&self) -> SceneNode {
        let mut copy = self.clone();
        copy.reassign_ids();
        copy
    }

    fn reassign_ids(&mut self) {
        self.id = NodeId::new();
        if let Some(children) = self.children_mut() {
            for child in children {
                child.reassign_ids();
            }
        }
    }

    /// Apply the `Some` fields of a patch
    pub fn apply(&mut self, patch: &NodePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(position) = patch.position {
            self.transform.position = position;
        }
        if let Some(rotation) = patch.rotation {
            self.transform.rotation = rotation;
        }
        if let Some(scale) = patch.scale {
            self.transform.scale = scale;
        }
        if let Some(pivot) = patch.pivot {
            self.pivot = pivot;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(base_dimensions) = patch.base_dimensions {
            self.base_dimensions = Some(base_dimensions);
        }
    }
}

/// Partial node update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub name: Option<String>,
    pub position: Option<DVec3>,
    pub rotation: Option<DVec3>,
    pub scale: Option<DVec3>,
    pub pivot: Option<DVec3>,
    pub color: Option<[f32; 4]>,
    pub base_dimensions: Option<DVec3>,
}

impl NodePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn position(mut self, position: DVec3) -> Self {
        self.position = Some(position);
        self
    }

    pub fn rotation(mut self, rotation: DVec3) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn scale(mut self, scale: DVec3) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn pivot(mut self, pivot: DVec3) -> Self {
        self.pivot = Some(pivot);
        self
    }

    pub fn color(mut self, color: [f32; 4]) -> Self {
        self.color = Some(color);
        self
    }

    pub fn base_dimensions(mut self, base_dimensions: DVec3) -> Self {
        self.base_dimensions = Some(base_dimensions);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_shape() {
        let group = SceneNode::group("g", vec![SceneNode::primitive(PrimitiveKind::Box, "b")]);
        assert_eq!(group.kind(), NodeKind::Group);
        assert!(group.base_dimensions.is_none());
        assert_eq!(group.children().unwrap().len(), 1);

        let cone = SceneNode::primitive(PrimitiveKind::Cone, "c");
        assert_eq!(cone.kind(), NodeKind::Primitive(PrimitiveKind::Cone));
        assert_eq!(cone.base_dimensions, Some(DVec3::ONE));
        assert!(cone.children().is_none());
    }

    #[test]
    fn test_fresh_copy_replaces_every_id() {
        let group = SceneNode::group(
            "g",
            vec![
                SceneNode::primitive(PrimitiveKind::Box, "a"),
                SceneNode::primitive(PrimitiveKind::Sphere, "b"),
            ],
        );
        let copy = group.fresh_copy();
        let original = group.subtree_ids();
        let copied = copy.subtree_ids();
        assert_eq!(original.len(), copied.len());
        assert!(copied.iter().all(|id| !original.contains(id)));
        assert_eq!(copy.children().unwrap()[1].name, "b");
    }

    #[test]
    fn test_patch_applies_only_set_fields() {
        let mut node = SceneNode::primitive(PrimitiveKind::Box, "Box 1");
        node.apply(&NodePatch::new().position(DVec3::X).name("Renamed"));
        assert_eq!(node.name, "Renamed");
        assert_eq!(node.transform.position, DVec3::X);
        assert_eq!(node.transform.scale, DVec3::ONE);
        assert!(NodePatch::new().is_empty());
    }

    #[test]
    fn test_parse_primitive_kind() {
        assert_eq!("torus".parse::<PrimitiveKind>(), Ok(PrimitiveKind::Torus));
        assert!("pyramid".parse::<PrimitiveKind>().is_err());
    }
}
