//! Transform composition and world placement
//!
//! A node's local matrix is `T(position) · R(rotation) · S(scale)` where the
//! rotation is intrinsic Euler X-Y-Z (`R = Rx · Ry · Rz`) and every scale
//! component is floored away from zero before use. Realized geometry is
//! shifted by the node's pivot before the matrix is applied.

use glam::{DMat3, DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::constants::MIN_SCALE;
use crate::mesh::Mesh;

/// Position, rotation (radians) and scale of a node relative to its parent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        rotation: DVec3::ZERO,
        scale: DVec3::ONE,
    };

    /// Identity rotation and unit scale at `position`
    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Scale with every component floored to `MIN_SCALE` magnitude
    pub fn effective_scale(&self) -> DVec3 {
        effective_scale(self.scale)
    }

    /// Rotation as a quaternion
    pub fn rotation_quat(&self) -> DQuat {
        euler_to_quat(self.rotation)
    }

    /// `T · R · S` with the floored scale
    pub fn to_mat4(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(
            self.effective_scale(),
            self.rotation_quat(),
            self.position,
        )
    }
}

/// Replace each component smaller than `MIN_SCALE` in magnitude with
/// `MIN_SCALE`, keeping its sign (zero counts as positive)
pub fn effective_scale(scale: DVec3) -> DVec3 {
    let floor = |s: f64| {
        if s.abs() >= MIN_SCALE {
            s
        } else if s.is_sign_negative() && s != 0.0 {
            -MIN_SCALE
        } else {
            MIN_SCALE
        }
    };
    DVec3::new(floor(scale.x), floor(scale.y), floor(scale.z))
}

/// Intrinsic X-Y-Z Euler angles to a quaternion
pub fn euler_to_quat(rotation: DVec3) -> DQuat {
    DQuat::from_rotation_x(rotation.x)
        * DQuat::from_rotation_y(rotation.y)
        * DQuat::from_rotation_z(rotation.z)
}

/// Quaternion to intrinsic X-Y-Z Euler angles
pub fn quat_to_euler(rotation: DQuat) -> DVec3 {
    let m = DMat3::from_quat(rotation.normalize());
    // Row/column naming: mRC is row R, column C
    let m11 = m.x_axis.x;
    let m12 = m.y_axis.x;
    let m13 = m.z_axis.x;
    let m22 = m.y_axis.y;
    let m23 = m.z_axis.y;
    let m32 = m.y_axis.z;
    let m33 = m.z_axis.z;

    let y = m13.clamp(-1.0, 1.0).asin();
    if m13.abs() < 0.999_999_9 {
        DVec3::new((-m23).atan2(m33), y, (-m12).atan2(m11))
    } else {
        // Gimbal lock: fold the Z rotation into X
        DVec3::new(m32.atan2(m22), y, 0.0)
    }
}

/// Local matrix of a node including its pivot offset
pub fn node_matrix(transform: &Transform, pivot: DVec3) -> DMat4 {
    transform.to_mat4() * DMat4::from_translation(pivot)
}

/// World matrix of `child` nested directly under `parent`
pub fn compose(parent: &Transform, child: &Transform) -> DMat4 {
    parent.to_mat4() * child.to_mat4()
}

/// Split an affine matrix back into position, Euler rotation and scale
pub fn decompose(matrix: &DMat4) -> Transform {
    let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
    Transform {
        position: translation,
        rotation: quat_to_euler(rotation),
        scale,
    }
}

/// Express `child` (relative to `parent`) directly in the parent's frame
pub fn rebase(parent: &Transform, child: &Transform) -> Transform {
    decompose(&compose(parent, child))
}

/// Place a local mesh in world space: `M · (v + pivot)`
pub fn world_place(mesh: &Mesh, transform: &Transform, pivot: DVec3) -> Mesh {
    world_place_with(mesh, &DMat4::IDENTITY, transform, pivot)
}

/// Place a local mesh under an additional ancestor matrix
pub fn world_place_with(
    mesh: &Mesh,
    parent_world: &DMat4,
    transform: &Transform,
    pivot: DVec3,
) -> Mesh {
    transform_mesh(mesh, &(*parent_world * node_matrix(transform, pivot)))
}

/// Apply a matrix to every vertex and normal.
///
/// Mirroring matrices reverse triangle winding so faces stay outward.
pub fn transform_mesh(mesh: &Mesh, matrix: &DMat4) -> Mesh {
    let vertices = mesh
        .vertices
        .iter()
        .map(|v| {
            matrix
                .transform_point3(DVec3::from(v.map(f64::from)))
                .as_vec3()
                .to_array()
        })
        .collect();

    let normal_matrix = DMat3::from_mat4(*matrix).inverse().transpose();
    let normals = mesh
        .normals
        .iter()
        .map(|n| {
            (normal_matrix * DVec3::from(n.map(f64::from)))
                .normalize_or_zero()
                .as_vec3()
                .to_array()
        })
        .collect();

    let mut indices = mesh.indices.clone();
    if matrix.determinant() < 0.0 {
        for tri in indices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
    }

    Mesh {
        vertices,
        normals,
        indices,
    }
}

/// Arithmetic mean of a set of points
pub fn centroid(points: impl IntoIterator<Item = DVec3>) -> Option<DVec3> {
    let (sum, count) = points
        .into_iter()
        .fold((DVec3::ZERO, 0usize), |(sum, n), p| (sum + p, n + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::generate_box_mesh;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn assert_vec_eq(a: DVec3, b: DVec3, eps: f64) {
        assert!((a - b).abs().max_element() < eps, "{a:?} != {b:?}");
    }

    #[test]
    fn test_scale_floor_keeps_sign() {
        let s = effective_scale(DVec3::new(0.0, -0.0001, 2.0));
        assert_eq!(s, DVec3::new(MIN_SCALE, -MIN_SCALE, 2.0));
    }

    #[test]
    fn test_zero_scale_is_invertible() {
        let transform = Transform {
            scale: DVec3::ZERO,
            ..Transform::IDENTITY
        };
        let m = transform.to_mat4();
        assert!(m.determinant().abs() > 0.0);
        assert!(m.inverse().is_finite());
    }

    #[test]
    fn test_rotation_is_intrinsic_xyz() {
        let rotation = DVec3::new(0.3, -0.2, 0.9);
        let expected = DMat3::from_rotation_x(rotation.x)
            * DMat3::from_rotation_y(rotation.y)
            * DMat3::from_rotation_z(rotation.z);
        let actual = DMat3::from_quat(euler_to_quat(rotation));
        for (a, e) in actual.to_cols_array().iter().zip(expected.to_cols_array()) {
            assert_abs_diff_eq!(*a, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_euler_round_trip() {
        for rotation in [
            DVec3::ZERO,
            DVec3::new(FRAC_PI_2, 0.0, 0.0),
            DVec3::new(0.0, 0.0, FRAC_PI_2),
            DVec3::new(0.4, 0.5, -1.2),
        ] {
            assert_vec_eq(quat_to_euler(euler_to_quat(rotation)), rotation, 1e-9);
        }
    }

    #[test]
    fn test_decompose_round_trip() {
        let transform = Transform {
            position: DVec3::new(1.0, -2.0, 3.0),
            rotation: DVec3::new(0.1, 0.2, 0.3),
            scale: DVec3::new(2.0, 0.5, 1.5),
        };
        let back = decompose(&transform.to_mat4());
        assert_vec_eq(back.position, transform.position, 1e-9);
        assert_vec_eq(back.rotation, transform.rotation, 1e-9);
        assert_vec_eq(back.scale, transform.scale, 1e-9);
    }

    #[test]
    fn test_world_place_centers_on_position() {
        let cube = Mesh::from(generate_box_mesh([1.0, 1.0, 1.0]));
        let position = DVec3::new(5.0, 0.0, -1.0);
        let placed = world_place(&cube, &Transform::from_position(position), DVec3::ZERO);
        assert_vec_eq(placed.bounds().unwrap().center(), position, 1e-6);

        let pivot = DVec3::new(0.5, 0.0, 0.0);
        let shifted = world_place(&cube, &Transform::from_position(position), pivot);
        assert_vec_eq(shifted.bounds().unwrap().center(), position + pivot, 1e-6);
    }

    #[test]
    fn test_mirror_keeps_outward_winding() {
        let cube = Mesh::from(generate_box_mesh([1.0, 1.0, 1.0]));
        let mirrored = Transform {
            scale: DVec3::new(-1.0, 1.0, 1.0),
            ..Transform::IDENTITY
        };
        let placed = world_place(&cube, &mirrored, DVec3::ZERO);
        assert!(placed.to_triangle_mesh().signed_volume() > 0.0);
    }

    #[test]
    fn test_centroid() {
        assert_eq!(centroid(Vec::new()), None);
        let c = centroid([DVec3::ZERO, DVec3::new(2.0, 4.0, 6.0)]).unwrap();
        assert_eq!(c, DVec3::new(1.0, 2.0, 3.0));
    }
}
