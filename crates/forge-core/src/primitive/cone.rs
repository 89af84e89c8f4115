//! Cone mesh generation (with base cap)

use std::f32::consts::PI;

use super::MeshData;

/// Generate a cone along the Z axis: base at `-height/2`, apex at `+height/2`
pub fn generate_cone_mesh(radius: f32, height: f32) -> MeshData {
    use crate::constants::CYLINDER_SEGMENTS;
    generate_cone_mesh_with_segments(radius, height, CYLINDER_SEGMENTS)
}

/// Generate a cone mesh with custom segment count
pub fn generate_cone_mesh_with_segments(radius: f32, height: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let half_height = height / 2.0;
    // Side normals tilt up by the cone's half-angle
    let slope = radius / height;
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    // Side: one apex vertex per segment so each face gets its own normal
    for i in 0..segments {
        let theta0 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta1 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let mid = (theta0 + theta1) / 2.0;
        let base = vertices.len() as u32;

        for theta in [theta0, theta1] {
            vertices.push([radius * theta.cos(), radius * theta.sin(), -half_height]);
            normals.push(side_normal(theta, slope));
        }
        vertices.push([0.0, 0.0, half_height]);
        normals.push(side_normal(mid, slope));

        indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    // Base cap
    let center_idx = vertices.len() as u32;
    vertices.push([0.0, 0.0, -half_height]);
    normals.push([0.0, 0.0, -1.0]);

    let rim_start = vertices.len() as u32;
    for i in 0..=segments {
        let theta = (i as f32 / segments as f32) * 2.0 * PI;
        vertices.push([radius * theta.cos(), radius * theta.sin(), -half_height]);
        normals.push([0.0, 0.0, -1.0]);
    }
    for i in 0..segments {
        indices.extend_from_slice(&[center_idx, rim_start + i + 1, rim_start + i]);
    }

    (vertices, normals, indices)
}

fn side_normal(theta: f32, slope: f32) -> [f32; 3] {
    let n = glam::Vec3::new(theta.cos(), theta.sin(), slope).normalize();
    n.to_array()
}
