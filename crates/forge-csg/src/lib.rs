//! Constructive Solid Geometry kernel
//!
//! This crate provides:
//! - Planes and convex polygons with robust plane splitting
//! - A BSP tree used to clip one polygon soup against another
//! - Boolean operations (union, subtract, intersect) on triangulated solids
//!
//! The kernel works on world-space triangle soups and knows nothing about
//! scene nodes; callers place the operands before handing them over.

mod bsp;
mod mesh;
mod plane;
mod polygon;
mod solid;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use mesh::TriangleMesh;
pub use plane::{PLANE_EPSILON, Plane, Split};
pub use polygon::Polygon;
pub use solid::Solid;

/// Boolean operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BooleanType {
    /// Space inside either operand
    Union,
    /// Space inside the first operand but not the second
    Subtract,
    /// Space inside both operands
    Intersect,
}

impl BooleanType {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            BooleanType::Union => "Union",
            BooleanType::Subtract => "Subtract",
            BooleanType::Intersect => "Intersect",
        }
    }

    /// All boolean types for UI
    pub fn all() -> &'static [BooleanType] {
        &[
            BooleanType::Union,
            BooleanType::Subtract,
            BooleanType::Intersect,
        ]
    }
}

/// Error type for CSG kernel operations
#[derive(Debug, Clone, Error)]
pub enum CsgError {
    #[error("Operand has no usable faces")]
    EmptyInput,

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),
}

/// Result type for CSG operations
pub type CsgResult<T> = Result<T, CsgError>;

/// Combine two world-space triangle meshes.
///
/// The returned mesh may be empty (for example a subtraction that removes
/// everything); deciding whether that is acceptable is left to the caller.
pub fn boolean(a: &TriangleMesh, b: &TriangleMesh, op: BooleanType) -> CsgResult<TriangleMesh> {
    let solid_a = Solid::from_mesh(a)?;
    let solid_b = Solid::from_mesh(b)?;

    tracing::debug!(
        "CSG {}: {} x {} polygons",
        op.display_name(),
        solid_a.polygons().len(),
        solid_b.polygons().len()
    );

    let result = match op {
        BooleanType::Union => solid_a.union(&solid_b),
        BooleanType::Subtract => solid_a.difference(&solid_b),
        BooleanType::Intersect => solid_a.intersection(&solid_b),
    };

    let mesh = result.to_mesh();
    tracing::debug!(
        "CSG {} produced {} polygons, {} triangles",
        op.display_name(),
        result.polygons().len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::cuboid;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_union_of_disjoint_boxes_keeps_both() {
        let a = cuboid([-0.5; 3], [0.5; 3]);
        let b = cuboid([99.5, -0.5, -0.5], [100.5, 0.5, 0.5]);

        let result = boolean(&a, &b, BooleanType::Union).unwrap();
        let (min, max) = result.bounds().unwrap();

        assert_abs_diff_eq!(min[0], -0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(max[0], 100.5, epsilon = 1e-9);
        assert_abs_diff_eq!(result.signed_volume(), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_overlapping_box_volumes() {
        let a = cuboid([-1.0; 3], [1.0; 3]);
        let b = cuboid([0.0, -2.0, -2.0], [2.0, 2.0, 2.0]);

        let union = boolean(&a, &b, BooleanType::Union).unwrap();
        let difference = boolean(&a, &b, BooleanType::Subtract).unwrap();
        let intersection = boolean(&a, &b, BooleanType::Intersect).unwrap();

        assert_abs_diff_eq!(union.signed_volume(), 36.0, epsilon = 1e-6);
        assert_abs_diff_eq!(difference.signed_volume(), 4.0, epsilon = 1e-6);
        assert_abs_diff_eq!(intersection.signed_volume(), 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_subtracting_identical_box_leaves_no_volume() {
        let a = cuboid([-0.5; 3], [0.5; 3]);
        let result = boolean(&a, &a, BooleanType::Subtract).unwrap();
        assert!(result.signed_volume().abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_intersection_is_empty() {
        let a = cuboid([-0.5; 3], [0.5; 3]);
        let b = cuboid([10.0; 3], [11.0; 3]);
        let result = boolean(&a, &b, BooleanType::Intersect).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_operand_is_rejected() {
        let a = cuboid([-0.5; 3], [0.5; 3]);
        let empty = TriangleMesh::default();
        assert!(matches!(
            boolean(&a, &empty, BooleanType::Union),
            Err(CsgError::EmptyInput)
        ));
    }
}
