//! Box (rectangular prism) mesh generation

use super::MeshData;

/// Face table: outward normal plus the two in-plane axes, ordered so that
/// `u × v == normal` keeps the winding counter-clockwise from outside
const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
    ([-1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
];

/// Generate a box mesh with the given dimensions
///
/// # Arguments
/// * `size` - [width (x), depth (y), height (z)]
///
/// # Returns
/// (vertices, normals, indices) - 24 vertices (4 per face), 12 triangles
pub fn generate_box_mesh(size: [f32; 3]) -> MeshData {
    let half = [size[0] / 2.0, size[1] / 2.0, size[2] / 2.0];

    let mut vertices = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u, v) in FACES {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner: [f32; 3] =
                std::array::from_fn(|i| (normal[i] + su * u[i] + sv * v[i]) * half[i]);
            vertices.push(corner);
            normals.push(normal);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, normals, indices)
}
