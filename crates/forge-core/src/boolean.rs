//! Boolean engine: combine two scene nodes into a new custom-mesh node
//!
//! The work is split in three so the expensive kernel call can run off the
//! main thread:
//! - [`prepare`] (or [`prepare_nested`]) realizes and world-places both
//!   operands,
//! - [`BooleanJob::compute`] runs the BSP kernel on owned meshes,
//! - [`BooleanJob::finish`] validates the result and builds the new node.
//!
//! None of the steps touch the scene graph. The result node is expressed in
//! the frame of A's parent so it can take A's slot.

use glam::{DMat4, DVec3};

use forge_csg::TriangleMesh;
pub use forge_csg::BooleanType;

use crate::config::TessellationConfig;
use crate::constants::{DEGENERATE_VOLUME_RATIO, MIN_SCALE};
use crate::id::NodeId;
use crate::mesh::normals::calculate_vertex_normals;
use crate::mesh::Mesh;
use crate::node::SceneNode;
use crate::realize::realize_with;
use crate::transform::{Transform, world_place_with};

/// Boolean engine errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BooleanError {
    #[error("Boolean operations do not accept groups: {0}")]
    UnsupportedOperand(NodeId),
    #[error("Invalid input geometry: {0}")]
    InvalidInputGeometry(String),
    #[error("Boolean kernel failed: {0}")]
    Combinator(String),
    #[error("Boolean result is empty or invalid: {0}")]
    EmptyOrInvalidResult(String),
    #[error("Node not found: {0}")]
    NotFound(NodeId),
}

/// The parts of an operand that survive into the result
#[derive(Debug, Clone)]
struct Operand {
    id: NodeId,
    name: String,
    /// Position in world space
    position: DVec3,
    color: [f32; 4],
}

impl Operand {
    fn of(node: &SceneNode, parent_world: &DMat4) -> Self {
        Self {
            id: node.id(),
            name: node.name.clone(),
            position: parent_world.transform_point3(node.transform.position),
            color: node.color,
        }
    }
}

/// Owned inputs for one boolean operation
#[derive(Debug, Clone)]
pub struct BooleanJob {
    op: BooleanType,
    a: Operand,
    b: Operand,
    /// World matrix of A's parent, the frame the result is stored in
    frame: DMat4,
    mesh_a: TriangleMesh,
    mesh_b: TriangleMesh,
}

/// Check two root-level operands and place both in world space
pub fn prepare(
    a: &SceneNode,
    b: &SceneNode,
    op: BooleanType,
    config: &TessellationConfig,
) -> Result<BooleanJob, BooleanError> {
    prepare_nested(
        (a, &DMat4::IDENTITY),
        (b, &DMat4::IDENTITY),
        op,
        config,
    )
}

/// Check two operands given with the world matrices of their parents and
/// place both in world space
pub fn prepare_nested(
    (a, a_parent): (&SceneNode, &DMat4),
    (b, b_parent): (&SceneNode, &DMat4),
    op: BooleanType,
    config: &TessellationConfig,
) -> Result<BooleanJob, BooleanError> {
    for node in [a, b] {
        if node.is_group() {
            return Err(BooleanError::UnsupportedOperand(node.id()));
        }
    }
    Ok(BooleanJob {
        op,
        a: Operand::of(a, a_parent),
        b: Operand::of(b, b_parent),
        frame: *a_parent,
        mesh_a: placed(a, a_parent, config)?,
        mesh_b: placed(b, b_parent, config)?,
    })
}

fn placed(
    node: &SceneNode,
    parent_world: &DMat4,
    config: &TessellationConfig,
) -> Result<TriangleMesh, BooleanError> {
    let invalid = |e: crate::mesh::GeometryError| {
        BooleanError::InvalidInputGeometry(format!("'{}': {}", node.name, e))
    };
    let local = realize_with(node, config).map_err(invalid)?;
    let world = world_place_with(&local, parent_world, &node.transform, node.pivot);
    world.validate().map_err(invalid)?;
    Ok(world.to_triangle_mesh())
}

impl BooleanJob {
    pub fn op(&self) -> BooleanType {
        self.op
    }

    /// Ids of the two operands (A, B)
    pub fn operands(&self) -> (NodeId, NodeId) {
        (self.a.id, self.b.id)
    }

    /// Run the kernel. Safe to call from a worker thread.
    pub fn compute(&self) -> Result<TriangleMesh, BooleanError> {
        forge_csg::boolean(&self.mesh_a, &self.mesh_b, self.op)
            .map_err(|e| BooleanError::Combinator(e.to_string()))
    }

    /// Validate a kernel result and wrap it in a new node.
    ///
    /// The node stores the result so that `frame * (position + scale * local)`
    /// reproduces the kernel's world coordinates, where `frame` is the world
    /// matrix of A's parent.
    pub fn finish(&self, result: TriangleMesh) -> Result<SceneNode, BooleanError> {
        let world = Mesh::from_triangle_mesh(&result);
        world
            .validate()
            .map_err(|e| BooleanError::EmptyOrInvalidResult(e.to_string()))?;

        let (min, max) = result
            .bounds()
            .ok_or_else(|| BooleanError::EmptyOrInvalidResult("no vertices".into()))?;
        let world_extents = DVec3::from(max) - DVec3::from(min);

        let volume = result.signed_volume();
        let reference = world_extents.max_element().powi(3);
        if volume.is_nan() || volume.abs() <= DEGENERATE_VOLUME_RATIO * reference {
            return Err(BooleanError::EmptyOrInvalidResult(format!(
                "degenerate result with volume {:e}",
                volume
            )));
        }

        let world_position = match self.op {
            BooleanType::Subtract => self.a.position,
            BooleanType::Union | BooleanType::Intersect => {
                (self.a.position + self.b.position) * 0.5
            }
        };

        let to_frame = self.frame.inverse();
        let position = to_frame.transform_point3(world_position);
        let framed: Vec<DVec3> = result
            .vertices
            .iter()
            .map(|v| to_frame.transform_point3(DVec3::from(*v)))
            .collect();
        let (min, max) = framed.iter().fold(
            (DVec3::splat(f64::MAX), DVec3::splat(f64::MIN)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );
        let scale = node_scale(max - min);

        let vertices: Vec<[f32; 3]> = framed
            .iter()
            .map(|p| ((*p - position) / scale).as_vec3().to_array())
            .collect();
        let mut indices = result.indices;
        // Placement under a mirrored parent flips the winding back
        if self.frame.determinant() < 0.0 {
            for tri in indices.chunks_exact_mut(3) {
                tri.swap(1, 2);
            }
        }
        let normals = calculate_vertex_normals(&vertices, &indices);
        let geometry = Mesh::new(vertices, normals, indices);

        let mut node = SceneNode::custom_mesh(
            format!("{}({}, {})", self.op.display_name(), self.a.name, self.b.name),
            geometry,
        )
        .with_transform(Transform {
            position,
            rotation: DVec3::ZERO,
            scale,
        })
        .with_color(self.a.color);
        node.base_dimensions = Some(DVec3::ONE);

        tracing::debug!(
            "{} produced {} triangles for '{}'",
            self.op.display_name(),
            node.geometry().map_or(0, Mesh::triangle_count),
            node.name
        );
        Ok(node)
    }
}

/// Scale stored on a result node: its extents, with axes thinner than the
/// scale floor left at 1
fn node_scale(extents: DVec3) -> DVec3 {
    let axis = |e: f64| if e.abs() < MIN_SCALE { 1.0 } else { e.abs() };
    DVec3::new(axis(extents.x), axis(extents.y), axis(extents.z))
}

/// Combine two nodes with default tessellation
pub fn combine(a: &SceneNode, b: &SceneNode, op: BooleanType) -> Result<SceneNode, BooleanError> {
    combine_with(a, b, op, &TessellationConfig::default())
}

/// Prepare, compute and finish on the calling thread
pub fn combine_with(
    a: &SceneNode,
    b: &SceneNode,
    op: BooleanType,
    config: &TessellationConfig,
) -> Result<SceneNode, BooleanError> {
    let job = prepare(a, b, op, config)?;
    let result = job.compute()?;
    job.finish(result)
}
