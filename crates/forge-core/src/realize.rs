//! Geometry realization: shape descriptor to local-frame mesh

use crate::config::TessellationConfig;
use crate::constants::{TORUS_MAJOR_RADIUS, TORUS_MINOR_RADIUS};
use crate::mesh::{GeometryError, Mesh};
use crate::node::{SceneNode, Shape};
use crate::primitive::{
    generate_box_mesh, generate_cone_mesh_with_segments, generate_cylinder_mesh_with_segments,
    generate_sphere_mesh_with_segments, generate_torus_mesh_with_segments,
};

/// Realize a node with default tessellation
pub fn realize(node: &SceneNode) -> Result<Mesh, GeometryError> {
    realize_with(node, &TessellationConfig::default())
}

/// Realize a node into a validated mesh centered on its local origin.
///
/// Groups have no geometry of their own. A custom mesh whose stored data is
/// unusable falls back to the unit box.
pub fn realize_with(node: &SceneNode, config: &TessellationConfig) -> Result<Mesh, GeometryError> {
    let mesh: Mesh = match &node.shape {
        Shape::Box => generate_box_mesh([1.0, 1.0, 1.0]).into(),
        Shape::Sphere => generate_sphere_mesh_with_segments(
            0.5,
            config.sphere_lat_segments,
            config.sphere_lon_segments,
        )
        .into(),
        Shape::Cylinder => {
            generate_cylinder_mesh_with_segments(0.5, 1.0, config.cylinder_segments).into()
        }
        Shape::Cone => generate_cone_mesh_with_segments(0.5, 1.0, config.cylinder_segments).into(),
        Shape::Torus => generate_torus_mesh_with_segments(
            TORUS_MAJOR_RADIUS,
            TORUS_MINOR_RADIUS,
            config.torus_major_segments,
            config.torus_minor_segments,
        )
        .into(),
        Shape::Group { .. } => {
            return Err(GeometryError::InvalidGeometry(format!(
                "group '{}' has no geometry",
                node.name
            )));
        }
        Shape::CustomMesh { geometry } => match geometry.validate() {
            Ok(()) => geometry.clone(),
            Err(e) => {
                tracing::warn!(
                    "Custom mesh '{}' ({}) is unusable, using a unit box: {}",
                    node.name,
                    node.id(),
                    e
                );
                generate_box_mesh([1.0, 1.0, 1.0]).into()
            }
        },
    };

    mesh.validate()?;
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::PrimitiveKind;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_every_primitive_is_unit_sized() {
        for &kind in PrimitiveKind::all() {
            let mesh = realize(&SceneNode::primitive(kind, kind.display_name())).unwrap();
            let bounds = mesh.bounds().unwrap();
            assert_abs_diff_eq!(bounds.center().length(), 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(bounds.size().x, 1.0, epsilon = 1e-5);
            assert!(mesh.to_triangle_mesh().signed_volume() > 0.0, "{kind} winds inward");
        }
    }

    #[test]
    fn test_group_is_not_realizable() {
        let group = SceneNode::group("Group 1", Vec::new());
        assert!(matches!(
            realize(&group),
            Err(GeometryError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_broken_custom_mesh_falls_back_to_box() {
        let broken = Mesh::new(vec![[0.0; 3], [1.0, 0.0, 0.0]], Vec::new(), vec![0, 1, 5]);
        let node = SceneNode::custom_mesh("Broken", broken);
        let mesh = realize(&node).unwrap();
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_tessellation_config_is_honored() {
        let config = TessellationConfig {
            cylinder_segments: 8,
            ..TessellationConfig::default()
        };
        let cylinder = SceneNode::primitive(PrimitiveKind::Cylinder, "c");
        let coarse = realize_with(&cylinder, &config).unwrap();
        let fine = realize(&cylinder).unwrap();
        assert!(coarse.triangle_count() < fine.triangle_count());
    }
}
