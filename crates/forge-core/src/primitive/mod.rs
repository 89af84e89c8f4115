//! Primitive mesh generation
//!
//! Generates vertices, normals, and indices for the built-in solids:
//! - Box (rectangular prism)
//! - Sphere (UV sphere)
//! - Cylinder (with end caps)
//! - Cone (with base cap)
//! - Torus
//!
//! Every generator is centered on the origin with its axis along +Z and winds
//! triangles counter-clockwise seen from outside.

mod box_mesh;
mod cone;
mod cylinder;
mod sphere;
mod torus;

pub use box_mesh::generate_box_mesh;
pub use cone::{generate_cone_mesh, generate_cone_mesh_with_segments};
pub use cylinder::{generate_cylinder_mesh, generate_cylinder_mesh_with_segments};
pub use sphere::{generate_sphere_mesh, generate_sphere_mesh_with_segments};
pub use torus::{generate_torus_mesh, generate_torus_mesh_with_segments};

/// Mesh data: vertices, normals, and triangle indices
pub type MeshData = (Vec<[f32; 3]>, Vec<[f32; 3]>, Vec<u32>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use approx::assert_abs_diff_eq;

    fn volume((vertices, _, indices): &MeshData) -> f64 {
        Mesh::new(vertices.clone(), Vec::new(), indices.clone())
            .to_triangle_mesh()
            .signed_volume()
    }

    fn extents((vertices, _, _): &MeshData) -> [f32; 3] {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for v in vertices {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }
        [max[0] - min[0], max[1] - min[1], max[2] - min[2]]
    }

    #[test]
    fn test_box_mesh() {
        let (vertices, normals, indices) = generate_box_mesh([1.0, 1.0, 1.0]);
        assert_eq!(vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(normals.len(), 24);
        assert_eq!(indices.len(), 36); // 6 faces * 2 triangles * 3 indices
    }

    #[test]
    fn test_box_dimensions() {
        let size = extents(&generate_box_mesh([2.0, 4.0, 6.0]));
        assert!((size[0] - 2.0).abs() < 0.001);
        assert!((size[1] - 4.0).abs() < 0.001);
        assert!((size[2] - 6.0).abs() < 0.001);
    }

    #[test]
    fn test_cylinder_mesh() {
        let (vertices, normals, indices) = generate_cylinder_mesh(0.5, 1.0);
        assert!(!vertices.is_empty());
        assert_eq!(vertices.len(), normals.len());
        assert!(indices.len() % 3 == 0); // Valid triangles
    }

    #[test]
    fn test_sphere_mesh_has_no_pole_slivers() {
        let (vertices, _, indices) = generate_sphere_mesh_with_segments(1.0, 4, 8);
        for tri in indices.chunks_exact(3) {
            let a = glam::Vec3::from(vertices[tri[0] as usize]);
            let b = glam::Vec3::from(vertices[tri[1] as usize]);
            let c = glam::Vec3::from(vertices[tri[2] as usize]);
            assert!((b - a).cross(c - a).length() > 1e-6);
        }
    }

    #[test]
    fn test_outward_winding() {
        assert_abs_diff_eq!(volume(&generate_box_mesh([1.0, 1.0, 1.0])), 1.0, epsilon = 1e-6);
        assert!(volume(&generate_sphere_mesh(0.5)) > 0.4);
        assert!(volume(&generate_cylinder_mesh(0.5, 1.0)) > 0.7);
        assert!(volume(&generate_cone_mesh(0.5, 1.0)) > 0.2);
        assert!(volume(&generate_torus_mesh(0.35, 0.15)) > 0.1);
    }

    #[test]
    fn test_natural_sizes() {
        let cone = extents(&generate_cone_mesh(0.5, 1.0));
        assert_abs_diff_eq!(cone[0], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(cone[2], 1.0, epsilon = 1e-5);

        let torus = extents(&generate_torus_mesh(0.35, 0.15));
        assert_abs_diff_eq!(torus[0], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(torus[2], 0.3, epsilon = 1e-5);
    }
}
