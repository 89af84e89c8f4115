//! Convex planar polygons

use glam::DVec3;

use crate::plane::Plane;

/// A convex polygon with its supporting plane
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Vertices in counter-clockwise order around `plane.normal`
    pub vertices: Vec<DVec3>,
    /// Supporting plane
    pub plane: Plane,
}

impl Polygon {
    /// Create a polygon, deriving its plane from the first three vertices.
    ///
    /// Returns `None` when there are fewer than three vertices or the first
    /// three are collinear.
    pub fn new(vertices: Vec<DVec3>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        Some(Self { vertices, plane })
    }

    /// Create a polygon that shares an existing plane (used for split fragments)
    pub fn with_plane(vertices: Vec<DVec3>, plane: Plane) -> Self {
        Self { vertices, plane }
    }

    /// Reverse the winding and the plane
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    /// Fan-triangulate the polygon
    pub fn triangles(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        let first = self.vertices[0];
        self.vertices
            .windows(2)
            .skip(1)
            .map(move |pair| [first, pair[0], pair[1]])
    }
}
