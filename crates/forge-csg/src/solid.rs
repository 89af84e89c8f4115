//! Polygon solids and boolean operations

use std::collections::HashMap;

use glam::DVec3;

use crate::bsp::Node;
use crate::mesh::TriangleMesh;
use crate::polygon::Polygon;
use crate::{CsgError, CsgResult};

/// Twice the smallest triangle area emitted when triangulating results
const MIN_OUTPUT_AREA: f64 = 1e-12;

/// A closed solid represented as a soup of convex polygons
#[derive(Debug, Clone, Default)]
pub struct Solid {
    polygons: Vec<Polygon>,
}

impl Solid {
    /// Create a solid from polygons
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// Create a solid from an indexed triangle mesh.
    ///
    /// Zero-area triangles are skipped; out-of-range indices and non-finite
    /// coordinates are rejected.
    pub fn from_mesh(mesh: &TriangleMesh) -> CsgResult<Self> {
        if mesh.indices.len() % 3 != 0 {
            return Err(CsgError::DegenerateInput(format!(
                "index count {} is not a multiple of 3",
                mesh.indices.len()
            )));
        }
        if mesh.vertices.iter().flatten().any(|c| !c.is_finite()) {
            return Err(CsgError::DegenerateInput(
                "non-finite vertex coordinate".into(),
            ));
        }

        let mut polygons = Vec::with_capacity(mesh.triangle_count());
        for chunk in mesh.indices.chunks_exact(3) {
            let mut corners = [DVec3::ZERO; 3];
            for (corner, &index) in corners.iter_mut().zip(chunk) {
                let v = mesh.vertices.get(index as usize).ok_or_else(|| {
                    CsgError::DegenerateInput(format!("index {} out of range", index))
                })?;
                *corner = DVec3::from(*v);
            }
            if let Some(polygon) = Polygon::new(corners.to_vec()) {
                polygons.push(polygon);
            }
        }

        if polygons.is_empty() {
            return Err(CsgError::EmptyInput);
        }
        Ok(Self { polygons })
    }

    /// Get the polygons
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Check if the solid has no polygons
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Space inside either solid
    #[must_use = "Use the new solid representing space in both solids"]
    pub fn union(&self, other: &Solid) -> Solid {
        let mut a = Node::new(self.polygons.clone());
        let mut b = Node::new(other.polygons.clone());

        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(b.all_polygons());

        Solid::from_polygons(a.all_polygons())
    }

    /// Space inside this solid but not inside `other`
    #[must_use = "Use the new solid"]
    pub fn difference(&self, other: &Solid) -> Solid {
        let mut a = Node::new(self.polygons.clone());
        let mut b = Node::new(other.polygons.clone());

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(b.all_polygons());
        a.invert();

        Solid::from_polygons(a.all_polygons())
    }

    /// Space inside both solids
    #[must_use = "Use the new solid"]
    pub fn intersection(&self, other: &Solid) -> Solid {
        let mut a = Node::new(self.polygons.clone());
        let mut b = Node::new(other.polygons.clone());

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(b.all_polygons());
        a.invert();

        Solid::from_polygons(a.all_polygons())
    }

    /// Flip inside and outside
    pub fn inverse(&self) -> Solid {
        let mut solid = self.clone();
        for polygon in &mut solid.polygons {
            polygon.flip();
        }
        solid
    }

    /// Triangulate into an indexed mesh, welding shared vertices
    pub fn to_mesh(&self) -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        let mut welded = HashMap::new();

        for polygon in &self.polygons {
            for [a, b, c] in polygon.triangles() {
                if (b - a).cross(c - a).length() <= MIN_OUTPUT_AREA {
                    continue;
                }
                mesh.push_triangle(&mut welded, [a.to_array(), b.to_array(), c.to_array()]);
            }
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::cuboid;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_from_mesh_skips_degenerate_triangles() {
        let mut mesh = cuboid([0.0; 3], [1.0; 3]);
        // Collinear sliver
        mesh.vertices.push([2.0, 0.0, 0.0]);
        mesh.vertices.push([3.0, 0.0, 0.0]);
        mesh.indices.extend_from_slice(&[0, 8, 9]);

        let solid = Solid::from_mesh(&mesh).unwrap();
        assert_eq!(solid.polygons().len(), 12);
    }

    #[test]
    fn test_from_mesh_rejects_bad_indices() {
        let mut mesh = cuboid([0.0; 3], [1.0; 3]);
        mesh.indices.extend_from_slice(&[0, 1, 42]);
        assert!(matches!(
            Solid::from_mesh(&mesh),
            Err(CsgError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_from_mesh_rejects_non_finite() {
        let mut mesh = cuboid([0.0; 3], [1.0; 3]);
        mesh.vertices[0][1] = f64::NAN;
        assert!(matches!(
            Solid::from_mesh(&mesh),
            Err(CsgError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_inverse_negates_volume() {
        let solid = Solid::from_mesh(&cuboid([0.0; 3], [1.0; 3])).unwrap();
        let volume = solid.to_mesh().signed_volume();
        assert_abs_diff_eq!(volume, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(solid.inverse().to_mesh().signed_volume(), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_contained_subtraction_makes_a_cavity() {
        let outer = Solid::from_mesh(&cuboid([-2.0; 3], [2.0; 3])).unwrap();
        let inner = Solid::from_mesh(&cuboid([-1.0; 3], [1.0; 3])).unwrap();

        let hollow = outer.difference(&inner).to_mesh();
        assert_abs_diff_eq!(hollow.signed_volume(), 56.0, epsilon = 1e-6);
    }
}
