//! Fixed-size 3×3 matrix kernels for the element hot path
//!
//! All matrices in the solver are compile-time-shaped nalgebra types
//! (`Matrix3`, `Matrix3x4`, `Matrix4`), so products, transposes, and scalar
//! scaling come from the library and stay on the stack. What the library
//! does not give us in the exact form we need is the cofactor inverse that
//! returns the determinant alongside the inverse: the determinant doubles as
//! J² when inverting the right Cauchy-Green tensor and as J when inverting
//! the deformation gradient, so it is always wanted together with the
//! inverse.

use nalgebra::Matrix3;
use thiserror::Error;

/// Inversion failure for a (near-)singular 3×3 matrix.
#[derive(Debug, Error)]
#[error("singular 3x3 matrix (det = {det})")]
pub struct DegenerateMatrix {
    pub det: f64,
}

/// Determinant of a 3×3 matrix by cofactor expansion along the first column.
pub fn det3(a: &Matrix3<f64>) -> f64 {
    a[(0, 0)] * (a[(1, 1)] * a[(2, 2)] - a[(1, 2)] * a[(2, 1)])
        - a[(1, 0)] * (a[(0, 1)] * a[(2, 2)] - a[(0, 2)] * a[(2, 1)])
        + a[(2, 0)] * (a[(0, 1)] * a[(1, 2)] - a[(0, 2)] * a[(1, 1)])
}

/// Adjugate inverse of a 3×3 matrix, returned together with the determinant.
///
/// The division is unchecked: a singular input yields non-finite entries,
/// which the time integrator reports as divergence. Use [`try_invert3`]
/// where a singular matrix must be a hard error instead.
pub fn invert3(a: &Matrix3<f64>) -> (Matrix3<f64>, f64) {
    let det = det3(a);
    let inv = Matrix3::new(
        (a[(1, 1)] * a[(2, 2)] - a[(1, 2)] * a[(2, 1)]) / det,
        (a[(0, 2)] * a[(2, 1)] - a[(0, 1)] * a[(2, 2)]) / det,
        (a[(0, 1)] * a[(1, 2)] - a[(0, 2)] * a[(1, 1)]) / det,
        (a[(1, 2)] * a[(2, 0)] - a[(1, 0)] * a[(2, 2)]) / det,
        (a[(0, 0)] * a[(2, 2)] - a[(0, 2)] * a[(2, 0)]) / det,
        (a[(0, 2)] * a[(1, 0)] - a[(0, 0)] * a[(1, 2)]) / det,
        (a[(1, 0)] * a[(2, 1)] - a[(1, 1)] * a[(2, 0)]) / det,
        (a[(0, 1)] * a[(2, 0)] - a[(0, 0)] * a[(2, 1)]) / det,
        (a[(0, 0)] * a[(1, 1)] - a[(0, 1)] * a[(1, 0)]) / det,
    );
    (inv, det)
}

/// Checked variant of [`invert3`] for reference-configuration setup.
///
/// Fails when |det| is not finite or falls below machine epsilon times the
/// mean absolute entry of the matrix.
pub fn try_invert3(a: &Matrix3<f64>) -> Result<(Matrix3<f64>, f64), DegenerateMatrix> {
    let det = det3(a);
    let scale = a.iter().map(|v| v.abs()).sum::<f64>() / 9.0;
    if !det.is_finite() || det.abs() < f64::EPSILON * scale {
        return Err(DegenerateMatrix { det });
    }
    Ok(invert3(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_det3_identity() {
        assert_relative_eq!(det3(&Matrix3::identity()), 1.0);
    }

    #[test]
    fn test_det3_known_matrix() {
        let a = Matrix3::new(2.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 4.0);
        assert_relative_eq!(det3(&a), 24.0);
    }

    #[test]
    fn test_invert3_roundtrip() {
        let a = Matrix3::new(2.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 4.0);
        let (inv, det) = invert3(&a);

        assert_relative_eq!(det, det3(&a), epsilon = 1e-12);

        let prod = a * inv;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(prod[(i, j)], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_try_invert3_rejects_singular() {
        // Rank-deficient: third row is the sum of the first two
        let a = Matrix3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 5.0, 7.0, 9.0);
        assert!(try_invert3(&a).is_err());
    }

    #[test]
    fn test_try_invert3_accepts_well_conditioned() {
        let a = Matrix3::new(1.0, 0.0, 0.5, 0.0, 2.0, 0.0, 0.5, 0.0, 3.0);
        let (_, det) = try_invert3(&a).unwrap();
        assert!(det > 0.0);
    }
}
