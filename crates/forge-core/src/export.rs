//! Mesh export: flatten the scene into world-space meshes

use glam::DMat4;

use crate::config::TessellationConfig;
use crate::mesh::{GeometryError, Mesh};
use crate::node::SceneNode;
use crate::realize::realize_with;
use crate::transform::world_place_with;

/// Realize every leaf and place it in world space, including the transforms
/// of its ancestor groups
pub fn world_meshes(
    objects: &[SceneNode],
    config: &TessellationConfig,
) -> Result<Vec<Mesh>, GeometryError> {
    let mut meshes = Vec::new();
    let mut stack: Vec<(&SceneNode, DMat4)> =
        objects.iter().rev().map(|n| (n, DMat4::IDENTITY)).collect();

    while let Some((node, parent_world)) = stack.pop() {
        match node.children() {
            Some(children) => {
                let world = parent_world * node.transform.to_mat4();
                stack.extend(children.iter().rev().map(|c| (c, world)));
            }
            None => {
                let local = realize_with(node, config)?;
                meshes.push(world_place_with(&local, &parent_world, &node.transform, node.pivot));
            }
        }
    }

    Ok(meshes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::PrimitiveKind;
    use crate::transform::Transform;
    use approx::assert_abs_diff_eq;
    use glam::DVec3;

    #[test]
    fn test_nested_leaves_get_ancestor_transforms() {
        let child = SceneNode::primitive(PrimitiveKind::Box, "Box 1").with_position(DVec3::X);
        let group = SceneNode::group("Group 1", vec![child]).with_transform(Transform {
            position: DVec3::new(0.0, 0.0, 10.0),
            scale: DVec3::splat(2.0),
            ..Transform::IDENTITY
        });
        let loose = SceneNode::primitive(PrimitiveKind::Sphere, "Sphere 1");

        let meshes = world_meshes(&[group, loose], &TessellationConfig::default()).unwrap();
        assert_eq!(meshes.len(), 2);

        let bounds = meshes[0].bounds().unwrap();
        assert_abs_diff_eq!(bounds.center().x, 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(bounds.center().z, 10.0, epsilon = 1e-5);
        assert_abs_diff_eq!(bounds.size().x, 2.0, epsilon = 1e-5);
    }
}
