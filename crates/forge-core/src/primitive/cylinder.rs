//! Cylinder mesh generation (with end caps)

use std::f32::consts::PI;

use super::MeshData;

/// Generate a cylinder mesh along the Z axis
///
/// # Arguments
/// * `radius` - Cylinder radius
/// * `height` - Cylinder height along Z
///
/// # Returns
/// (vertices, normals, indices)
pub fn generate_cylinder_mesh(radius: f32, height: f32) -> MeshData {
    use crate::constants::CYLINDER_SEGMENTS;
    generate_cylinder_mesh_with_segments(radius, height, CYLINDER_SEGMENTS)
}

/// Generate a cylinder mesh with custom segment count
pub fn generate_cylinder_mesh_with_segments(radius: f32, height: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let half_height = height / 2.0;
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    let ring = |i: u32| {
        let theta = (i as f32 / segments as f32) * 2.0 * PI;
        (theta.cos(), theta.sin())
    };

    // Side: bottom/top vertex pairs
    for i in 0..=segments {
        let (c, s) = ring(i);
        vertices.push([radius * c, radius * s, -half_height]);
        normals.push([c, s, 0.0]);
        vertices.push([radius * c, radius * s, half_height]);
        normals.push([c, s, 0.0]);
    }
    for i in 0..segments {
        let base = i * 2;
        indices.extend_from_slice(&[base, base + 2, base + 1, base + 1, base + 2, base + 3]);
    }

    // Caps: top winds with the ring, bottom against it
    for (z, nz) in [(half_height, 1.0), (-half_height, -1.0)] {
        let center = vertices.len() as u32;
        vertices.push([0.0, 0.0, z]);
        normals.push([0.0, 0.0, nz]);

        let rim = vertices.len() as u32;
        for i in 0..=segments {
            let (c, s) = ring(i);
            vertices.push([radius * c, radius * s, z]);
            normals.push([0.0, 0.0, nz]);
        }
        for i in 0..segments {
            if nz > 0.0 {
                indices.extend_from_slice(&[center, rim + i, rim + i + 1]);
            } else {
                indices.extend_from_slice(&[center, rim + i + 1, rim + i]);
            }
        }
    }

    (vertices, normals, indices)
}
