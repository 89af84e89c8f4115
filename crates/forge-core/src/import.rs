//! Mesh import: turn an external mesh into a scene node

use std::path::Path;

use glam::DVec3;

use crate::mesh::normals::calculate_vertex_normals;
use crate::mesh::{GeometryError, Mesh};
use crate::node::SceneNode;

/// Build a custom-mesh node from an imported mesh.
///
/// The mesh is recentered on its bounding-box center, its natural size is
/// kept as the node's base dimensions, and the node is lifted so its bottom
/// rests on the z = 0 plane.
pub fn import_mesh(name: impl Into<String>, mesh: Mesh) -> Result<SceneNode, GeometryError> {
    mesh.validate()?;
    let bounds = mesh
        .bounds()
        .ok_or_else(|| GeometryError::InvalidGeometry("mesh has no vertices".into()))?;
    let size = bounds.size();

    let mut local = mesh.translated(-bounds.center());
    if local.normals.len() != local.vertices.len() {
        local.normals = calculate_vertex_normals(&local.vertices, &local.indices);
    }

    let mut node =
        SceneNode::custom_mesh(name, local).with_position(DVec3::new(0.0, 0.0, size.z / 2.0));
    node.base_dimensions = Some(size);
    Ok(node)
}

/// Node name for a file: its stem, or "Imported" when there is none
pub fn name_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Imported")
        .to_string()
}
