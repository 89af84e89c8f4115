//! Global constants for forge-core

/// STL vertex comparison precision (multiply by this, then round to int)
pub const STL_VERTEX_PRECISION: f32 = 10000.0;

/// Default number of segments for cylinder and cone mesh generation
pub const CYLINDER_SEGMENTS: u32 = 32;

/// Default number of latitude segments for sphere mesh generation
pub const SPHERE_LAT_SEGMENTS: u32 = 16;

/// Default number of longitude segments for sphere mesh generation
pub const SPHERE_LON_SEGMENTS: u32 = 32;

/// Default number of segments around the torus axis
pub const TORUS_MAJOR_SEGMENTS: u32 = 32;

/// Default number of segments around the torus tube
pub const TORUS_MINOR_SEGMENTS: u32 = 16;

/// Distance from the torus axis to the tube center (natural size)
pub const TORUS_MAJOR_RADIUS: f32 = 0.35;

/// Torus tube radius (natural size)
pub const TORUS_MINOR_RADIUS: f32 = 0.15;

/// Smallest scale magnitude seen by geometry code
pub const MIN_SCALE: f64 = 1e-3;

/// Boolean results whose volume is below this fraction of their bounding
/// cube are treated as degenerate
pub const DEGENERATE_VOLUME_RATIO: f64 = 1e-9;

/// Default color for new nodes (gray, RGBA)
pub const DEFAULT_COLOR: [f32; 4] = [0.7, 0.7, 0.7, 1.0];

/// Project document format version written by this crate
pub const PROJECT_VERSION: &str = "1.0";
