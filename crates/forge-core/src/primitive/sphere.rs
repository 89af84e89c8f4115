//! UV sphere

use std::f32::consts::{PI, TAU};

use super::MeshData;
use crate::constants::{SPHERE_LAT_SEGMENTS, SPHERE_LON_SEGMENTS};

/// UV sphere with the default resolution
pub fn generate_sphere_mesh(radius: f32) -> MeshData {
    generate_sphere_mesh_with_segments(radius, SPHERE_LAT_SEGMENTS, SPHERE_LON_SEGMENTS)
}

/// UV sphere from `rings` latitude bands of `sectors` quads each.
///
/// The bands touching the poles emit one triangle per sector, so the mesh
/// carries no zero-area triangles.
pub fn generate_sphere_mesh_with_segments(radius: f32, rings: u32, sectors: u32) -> MeshData {
    let rings = rings.max(2);
    let sectors = sectors.max(3);
    let stride = sectors + 1;

    let unit: Vec<[f32; 3]> = (0..=rings)
        .flat_map(|ring| {
            let (sin_t, cos_t) = (PI * ring as f32 / rings as f32).sin_cos();
            (0..=sectors).map(move |sector| {
                let (sin_p, cos_p) = (TAU * sector as f32 / sectors as f32).sin_cos();
                [sin_t * cos_p, sin_t * sin_p, cos_t]
            })
        })
        .collect();
    let vertices = unit.iter().map(|n| n.map(|c| c * radius)).collect();

    let mut indices = Vec::with_capacity((rings * sectors * 6) as usize);
    for ring in 0..rings {
        for sector in 0..sectors {
            let upper = ring * stride + sector;
            let lower = upper + stride;
            if ring > 0 {
                indices.extend([upper, lower, upper + 1]);
            }
            if ring + 1 < rings {
                indices.extend([upper + 1, lower, lower + 1]);
            }
        }
    }

    (vertices, unit, indices)
}
