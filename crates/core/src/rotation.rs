//! Rotation helpers for moving surface points between observer and body frames.
//!
//! All angles are radians. Rotations are right-handed and act on column vectors.

use crate::vector::{self, Vector3};

/// Numerical tolerance used to dodge the singular branches of the Euler decomposition.
const EULER_TOL: f64 = 1e-16;

type Matrix3 = [[f64; 3]; 3];

fn mat_vec(m: &Matrix3, v: &Vector3) -> Vector3 {
    [
        vector::dot(&m[0], v),
        vector::dot(&m[1], v),
        vector::dot(&m[2], v),
    ]
}

/// Rotate the coordinates of `p` by `Rz(gamma) · Ry(beta) · Rx(alpha)`.
///
/// The x rotation is applied first, the z rotation last.
pub fn rotate_basis(p: &Vector3, alpha: f64, beta: f64, gamma: f64) -> Vector3 {
    let (sa, ca) = alpha.sin_cos();
    let (sb, cb) = beta.sin_cos();
    let (sg, cg) = gamma.sin_cos();
    let rx = [[1.0, 0.0, 0.0], [0.0, ca, -sa], [0.0, sa, ca]];
    let ry = [[cb, 0.0, sb], [0.0, 1.0, 0.0], [-sb, 0.0, cb]];
    let rz = [[cg, -sg, 0.0], [sg, cg, 0.0], [0.0, 0.0, 1.0]];
    mat_vec(&rz, &mat_vec(&ry, &mat_vec(&rx, p)))
}

/// Rotate `p` about axis `u` by `theta` (Rodrigues' rotation matrix).
///
/// Returns `None` when `u` has zero length.
pub fn rotate_axis_angle(p: &Vector3, u: &Vector3, theta: f64) -> Option<Vector3> {
    let [ux, uy, uz] = vector::normalize(u)?;
    let (s, c) = theta.sin_cos();
    let k = 1.0 - c;
    let r = [
        [c + ux * ux * k, ux * uy * k - uz * s, ux * uz * k + uy * s],
        [uy * ux * k + uz * s, c + uy * uy * k, uy * uz * k - ux * s],
        [uz * ux * k - uy * s, uz * uy * k + ux * s, c + uz * uz * k],
    ];
    Some(mat_vec(&r, p))
}

/// Angle between two vectors in radians, or `None` if either has zero length.
pub fn angle_between(v0: &Vector3, v1: &Vector3) -> Option<f64> {
    let a = vector::normalize(v0)?;
    let b = vector::normalize(v1)?;
    Some(vector::dot(&a, &b).clamp(-1.0, 1.0).acos())
}

/// Euler angles `(alpha, beta, gamma)` of the rotation by `theta` about axis `u`.
///
/// Decomposes the axis-angle matrix in the z-y-z convention used by
/// spherical-harmonic rotation codes. Degenerate inputs are nudged by a
/// tolerance of 1e-16:
/// - a zero `theta` is replaced by the tolerance
/// - an axis with zero x and y components gets both set to the tolerance
///
/// Returns `None` when `u` has zero length.
pub fn euler_angles(u: &Vector3, theta: f64) -> Option<(f64, f64, f64)> {
    let [mut ux, mut uy, uz] = vector::normalize(u)?;
    let theta = if theta == 0.0 { EULER_TOL } else { theta };
    if ux == 0.0 && uy == 0.0 {
        ux = EULER_TOL;
        uy = EULER_TOL;
    }

    let (sin_t, cos_t) = theta.sin_cos();
    let k = 1.0 - cos_t;
    let ra01 = ux * uy * k - uz * sin_t;
    let ra02 = ux * uz * k + uy * sin_t;
    let ra11 = cos_t + uy * uy * k;
    let ra12 = uy * uz * k - ux * sin_t;
    let ra20 = uz * ux * k - uy * sin_t;
    let ra21 = uz * uy * k + ux * sin_t;
    let ra22 = cos_t + uz * uz * k;

    let (cos_beta, sin_beta, cos_gamma, sin_gamma, cos_alpha, sin_alpha);
    if ra22 < -1.0 + EULER_TOL && ra22 > -1.0 - EULER_TOL {
        cos_beta = -1.0;
        sin_beta = 0.0;
        cos_gamma = ra11;
        sin_gamma = ra01;
        cos_alpha = 1.0;
        sin_alpha = 0.0;
    } else if ra22 < 1.0 + EULER_TOL && ra22 > 1.0 - EULER_TOL {
        cos_beta = 1.0;
        sin_beta = 0.0;
        cos_gamma = ra11;
        sin_gamma = -ra01;
        cos_alpha = 1.0;
        sin_alpha = 0.0;
    } else {
        cos_beta = ra22;
        sin_beta = (1.0 - cos_beta * cos_beta).max(0.0).sqrt();
        let norm1 = (ra20 * ra20 + ra21 * ra21).sqrt();
        let norm2 = (ra02 * ra02 + ra12 * ra12).sqrt();
        cos_gamma = -ra20 / norm1;
        sin_gamma = ra21 / norm1;
        cos_alpha = ra02 / norm2;
        sin_alpha = ra12 / norm2;
    }

    Some((
        sin_alpha.atan2(cos_alpha),
        sin_beta.atan2(cos_beta),
        sin_gamma.atan2(cos_gamma),
    ))
}
