//! Torus mesh generation

use std::f32::consts::PI;

use super::MeshData;

/// Generate a torus around the Z axis
///
/// # Arguments
/// * `major_radius` - Distance from the axis to the tube center
/// * `minor_radius` - Tube radius
pub fn generate_torus_mesh(major_radius: f32, minor_radius: f32) -> MeshData {
    use crate::constants::{TORUS_MAJOR_SEGMENTS, TORUS_MINOR_SEGMENTS};
    generate_torus_mesh_with_segments(
        major_radius,
        minor_radius,
        TORUS_MAJOR_SEGMENTS,
        TORUS_MINOR_SEGMENTS,
    )
}

/// Generate a torus mesh with custom resolution
pub fn generate_torus_mesh_with_segments(
    major_radius: f32,
    minor_radius: f32,
    major_segments: u32,
    minor_segments: u32,
) -> MeshData {
    let major_segments = major_segments.max(3);
    let minor_segments = minor_segments.max(3);
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for i in 0..=major_segments {
        let u = (i as f32 / major_segments as f32) * 2.0 * PI;
        let (sin_u, cos_u) = u.sin_cos();

        for j in 0..=minor_segments {
            let v = (j as f32 / minor_segments as f32) * 2.0 * PI;
            let (sin_v, cos_v) = v.sin_cos();

            let ring = major_radius + minor_radius * cos_v;
            vertices.push([ring * cos_u, ring * sin_u, minor_radius * sin_v]);
            normals.push([cos_v * cos_u, cos_v * sin_u, sin_v]);
        }
    }

    let stride = minor_segments + 1;
    for i in 0..major_segments {
        for j in 0..minor_segments {
            let a = i * stride + j;
            let b = a + stride;
            let c = b + 1;
            let d = a + 1;
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }

    (vertices, normals, indices)
}
