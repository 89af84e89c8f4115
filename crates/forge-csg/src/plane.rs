//! Planes and polygon classification

use glam::DVec3;

use crate::polygon::Polygon;

/// Tolerance used to decide whether a point lies on a plane
pub const PLANE_EPSILON: f64 = 1e-5;

/// Smallest cross-product length accepted when deriving a plane
const MIN_NORMAL_LENGTH: f64 = 1e-12;

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

/// An oriented plane `normal · p = w`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal
    pub normal: DVec3,
    /// Signed distance of the plane from the origin along `normal`
    pub w: f64,
}

/// Outcome of splitting a polygon by a plane
#[derive(Debug, Clone)]
pub enum Split {
    /// Lies in the plane, facing the same way
    CoplanarFront(Polygon),
    /// Lies in the plane, facing the opposite way
    CoplanarBack(Polygon),
    /// Entirely in front of the plane
    Front(Polygon),
    /// Entirely behind the plane
    Back(Polygon),
    /// Crosses the plane; either side may be too small to keep
    Spanning {
        front: Option<Polygon>,
        back: Option<Polygon>,
    },
}

impl Plane {
    /// Plane through three points, wound counter-clockwise around the normal.
    ///
    /// Returns `None` for collinear or non-finite points.
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        let n = (b - a).cross(c - a);
        let length = n.length();
        if !length.is_finite() || length < MIN_NORMAL_LENGTH {
            return None;
        }
        let normal = n / length;
        Some(Self {
            normal,
            w: normal.dot(a),
        })
    }

    /// Reverse the orientation
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Signed distance from the plane
    pub fn distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.w
    }

    fn classify(&self, point: DVec3) -> u8 {
        let t = self.distance(point);
        if t < -PLANE_EPSILON {
            BACK
        } else if t > PLANE_EPSILON {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Classify a polygon against this plane, splitting it when it spans.
    pub fn split(&self, polygon: Polygon) -> Split {
        let types: Vec<u8> = polygon
            .vertices
            .iter()
            .map(|v| self.classify(*v))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(polygon.plane.normal) > 0.0 {
                    Split::CoplanarFront(polygon)
                } else {
                    Split::CoplanarBack(polygon)
                }
            }
            FRONT => Split::Front(polygon),
            BACK => Split::Back(polygon),
            _ => {
                let count = polygon.vertices.len();
                let mut front = Vec::with_capacity(count + 1);
                let mut back = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (polygon.vertices[i], polygon.vertices[j]);

                    if ti != BACK {
                        front.push(vi);
                    }
                    if ti != FRONT {
                        back.push(vi);
                    }
                    if ti | tj == SPANNING {
                        let t = (self.w - self.normal.dot(vi)) / self.normal.dot(vj - vi);
                        let v = vi.lerp(vj, t);
                        front.push(v);
                        back.push(v);
                    }
                }

                let plane = polygon.plane;
                Split::Spanning {
                    front: (front.len() >= 3).then(|| Polygon::with_plane(front, plane)),
                    back: (back.len() >= 3).then(|| Polygon::with_plane(back, plane)),
                }
            }
        }
    }
}
