//! Indexed triangle meshes exchanged with the kernel

use std::collections::HashMap;

/// Vertex welding precision (multiply by this, then round to int)
const WELD_PRECISION: f64 = 1.0e6;

/// An indexed triangle mesh in world space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions
    pub vertices: Vec<[f64; 3]>,
    /// Triangle indices (3 indices per triangle)
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.len() < 3
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a triangle, welding vertices that coincide with existing ones
    pub(crate) fn push_triangle(
        &mut self,
        welded: &mut HashMap<[i64; 3], u32>,
        triangle: [[f64; 3]; 3],
    ) {
        for v in triangle {
            let key = [
                (v[0] * WELD_PRECISION).round() as i64,
                (v[1] * WELD_PRECISION).round() as i64,
                (v[2] * WELD_PRECISION).round() as i64,
            ];
            let index = *welded.entry(key).or_insert_with(|| {
                self.vertices.push(v);
                (self.vertices.len() - 1) as u32
            });
            self.indices.push(index);
        }
    }

    /// Axis-aligned bounds as (min, max), or `None` for an empty mesh
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        if self.vertices.is_empty() {
            return None;
        }

        let mut min = [f64::MAX; 3];
        let mut max = [f64::MIN; 3];
        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }
        Some((min, max))
    }

    /// Signed volume enclosed by the mesh (positive for outward winding)
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;
        for chunk in self.indices.chunks_exact(3) {
            let a = glam::DVec3::from(self.vertices[chunk[0] as usize]);
            let b = glam::DVec3::from(self.vertices[chunk[1] as usize]);
            let c = glam::DVec3::from(self.vertices[chunk[2] as usize]);
            volume += a.dot(b.cross(c));
        }
        volume / 6.0
    }
}
