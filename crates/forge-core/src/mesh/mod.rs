//! Triangle mesh values and interchange
//!
//! [`Mesh`] is the explicit geometry value stored inside custom-mesh nodes and
//! produced by the realizer. Positions are kept in `f32` like every other
//! renderable buffer; the boolean kernel works on an `f64` copy.

pub mod normals;
pub mod stl;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::primitive::MeshData;

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions
    #[serde(default)]
    pub vertices: Vec<[f32; 3]>,
    /// Per-vertex normals (empty when absent)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (3 indices per triangle)
    #[serde(default)]
    pub indices: Vec<u32>,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Box center
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Extents along each axis
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Smallest box enclosing both
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Geometry validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

impl Mesh {
    /// Create a mesh from buffers
    pub fn new(vertices: Vec<[f32; 3]>, normals: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            normals,
            indices,
        }
    }

    /// Check if the mesh has no triangles
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.len() < 3
    }

    /// Get the number of complete triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check that the mesh can be handed to downstream geometry code.
    ///
    /// A valid mesh has at least three vertices, at least one complete
    /// triangle, only in-range indices and only finite coordinates.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.vertices.is_empty() {
            return Err(GeometryError::InvalidGeometry(
                "missing position buffer".into(),
            ));
        }
        if self.vertices.len() < 3 {
            return Err(GeometryError::InvalidGeometry(format!(
                "{} vertices, need at least 3",
                self.vertices.len()
            )));
        }
        if self.triangle_count() == 0 {
            return Err(GeometryError::InvalidGeometry("no triangles".into()));
        }
        let count = self.vertices.len();
        if let Some(index) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(GeometryError::InvalidGeometry(format!(
                "index {} out of range for {} vertices",
                index, count
            )));
        }
        if self.vertices.iter().flatten().any(|c| !c.is_finite()) {
            return Err(GeometryError::InvalidGeometry(
                "non-finite vertex coordinate".into(),
            ));
        }
        Ok(())
    }

    /// Bounding box of all vertices, or `None` for an empty mesh
    pub fn bounds(&self) -> Option<Aabb> {
        let mut iter = self.vertices.iter().map(|v| v.map(f64::from)).map(DVec3::from);
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), v| (min.min(v), max.max(v)));
        Some(Aabb { min, max })
    }

    /// Copy of the mesh with every vertex moved by `offset`
    pub fn translated(&self, offset: DVec3) -> Mesh {
        let vertices = self
            .vertices
            .iter()
            .map(|v| (DVec3::from(v.map(f64::from)) + offset).as_vec3().to_array())
            .collect();
        Mesh {
            vertices,
            normals: self.normals.clone(),
            indices: self.indices.clone(),
        }
    }

    /// Convert to the boolean kernel's `f64` mesh
    pub fn to_triangle_mesh(&self) -> forge_csg::TriangleMesh {
        forge_csg::TriangleMesh {
            vertices: self.vertices.iter().map(|v| v.map(f64::from)).collect(),
            indices: self.indices.clone(),
        }
    }

    /// Convert a kernel mesh back, dropping to `f32` positions
    pub fn from_triangle_mesh(mesh: &forge_csg::TriangleMesh) -> Self {
        Self {
            vertices: mesh.vertices.iter().map(|v| v.map(|c| c as f32)).collect(),
            normals: Vec::new(),
            indices: mesh.indices.clone(),
        }
    }
}

impl From<MeshData> for Mesh {
    fn from((vertices, normals, indices): MeshData) -> Self {
        Self::new(vertices, normals, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::generate_box_mesh;
    use approx::assert_abs_diff_eq;

    fn triangle() -> Mesh {
        Mesh::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            Vec::new(),
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_validate_accepts_triangle() {
        assert!(triangle().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_meshes() {
        assert!(Mesh::default().validate().is_err());

        let mut short = triangle();
        short.vertices.truncate(2);
        short.indices = vec![0, 1, 1];
        assert!(short.validate().is_err());

        let mut no_triangles = triangle();
        no_triangles.indices.truncate(2);
        assert!(no_triangles.validate().is_err());

        let mut out_of_range = triangle();
        out_of_range.indices[2] = 3;
        assert!(out_of_range.validate().is_err());

        let mut nan = triangle();
        nan.vertices[1][0] = f32::NAN;
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_bounds() {
        let mesh = Mesh::from(generate_box_mesh([2.0, 4.0, 6.0]));
        let bounds = mesh.bounds().unwrap();
        assert_abs_diff_eq!(bounds.center().length(), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bounds.size().x, 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bounds.size().y, 4.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bounds.size().z, 6.0, epsilon = 1e-6);
        assert!(Mesh::default().bounds().is_none());
    }

    #[test]
    fn test_translated() {
        let moved = triangle().translated(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(moved.vertices[0], [1.0, 2.0, 3.0]);
        assert_eq!(moved.indices, vec![0, 1, 2]);
    }
}
