//! Normal calculation utilities for mesh data

use glam::Vec3;

/// Calculate normal for a single triangle
pub fn calculate_triangle_normal(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> [f32; 3] {
    let (a, b, c) = (Vec3::from(v0), Vec3::from(v1), Vec3::from(v2));
    let normal = (b - a).cross(c - a).normalize_or_zero();
    if normal == Vec3::ZERO {
        [0.0, 0.0, 1.0]
    } else {
        normal.to_array()
    }
}

/// Calculate one normal per triangle
pub fn calculate_face_normals(vertices: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    indices
        .chunks_exact(3)
        .map(|chunk| {
            calculate_triangle_normal(
                vertices[chunk[0] as usize],
                vertices[chunk[1] as usize],
                vertices[chunk[2] as usize],
            )
        })
        .collect()
}

/// Calculate smooth per-vertex normals by averaging adjacent face normals
/// weighted by triangle area
pub fn calculate_vertex_normals(vertices: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accumulated = vec![Vec3::ZERO; vertices.len()];
    for chunk in indices.chunks_exact(3) {
        let [i0, i1, i2] = [chunk[0] as usize, chunk[1] as usize, chunk[2] as usize];
        let (a, b, c) = (
            Vec3::from(vertices[i0]),
            Vec3::from(vertices[i1]),
            Vec3::from(vertices[i2]),
        );
        let weighted = (b - a).cross(c - a);
        accumulated[i0] += weighted;
        accumulated[i1] += weighted;
        accumulated[i2] += weighted;
    }
    accumulated
        .into_iter()
        .map(|n| {
            let n = n.normalize_or_zero();
            if n == Vec3::ZERO { [0.0, 0.0, 1.0] } else { n.to_array() }
        })
        .collect()
}
