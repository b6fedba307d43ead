/// Thermal-expansion models
///
/// Builds the thermal-expansion deformation gradient X_exp used in the
/// multiplicative split X = X_el · X_exp. The elastic gradient is recovered
/// by inverting X_exp, and the stress is pulled back to the reference
/// configuration by J_exp · X_exp⁻¹ · S · X_exp⁻ᵀ so the internal forces
/// keep their reference-integral form.

use nalgebra::{Matrix3, Vector3};

/// Thermal-expansion model for a tetrahedral element
#[derive(Debug, Clone)]
pub enum ThermalExpansion {
    /// Equal expansion coefficient αᵢ in all directions
    Isotropic { alpha: f64 },
    /// Distinct coefficient α_m along one material direction m
    TransverselyIsotropic {
        alpha: f64,
        /// α_m − αᵢ, applied on the structure tensor M = m̂⊗m̂
        alpha_m_delta: f64,
        structure_m: Matrix3<f64>,
    },
    /// Distinct coefficients along two material directions m and n
    Orthotropic {
        alpha: f64,
        alpha_m_delta: f64,
        structure_m: Matrix3<f64>,
        /// α_n − αᵢ, applied on N = n̂⊗n̂
        alpha_n_delta: f64,
        structure_n: Matrix3<f64>,
    },
}

fn structure_tensor(dir: Vector3<f64>) -> Matrix3<f64> {
    let d = dir.normalize();
    d * d.transpose()
}

impl ThermalExpansion {
    pub fn isotropic(alpha: f64) -> Self {
        Self::Isotropic { alpha }
    }

    /// Transversely isotropic expansion; `m` is normalized internally.
    pub fn transversely_isotropic(alpha: f64, alpha_m: f64, m: Vector3<f64>) -> Self {
        Self::TransverselyIsotropic {
            alpha,
            alpha_m_delta: alpha_m - alpha,
            structure_m: structure_tensor(m),
        }
    }

    /// Orthotropic expansion; `m` and `n` are normalized independently.
    pub fn orthotropic(
        alpha: f64,
        alpha_m: f64,
        m: Vector3<f64>,
        alpha_n: f64,
        n: Vector3<f64>,
    ) -> Self {
        Self::Orthotropic {
            alpha,
            alpha_m_delta: alpha_m - alpha,
            structure_m: structure_tensor(m),
            alpha_n_delta: alpha_n - alpha,
            structure_n: structure_tensor(n),
        }
    }

    /// Thermal-expansion deformation gradient for a temperature rise `dt`
    /// above the reference temperature.
    pub fn gradient(&self, dt: f64) -> Matrix3<f64> {
        match self {
            Self::Isotropic { alpha } => Matrix3::from_diagonal_element(1.0 + alpha * dt),
            Self::TransverselyIsotropic {
                alpha,
                alpha_m_delta,
                structure_m,
            } => {
                Matrix3::from_diagonal_element(1.0 + alpha * dt) + (alpha_m_delta * dt) * structure_m
            }
            Self::Orthotropic {
                alpha,
                alpha_m_delta,
                structure_m,
                alpha_n_delta,
                structure_n,
            } => {
                Matrix3::from_diagonal_element(1.0 + alpha * dt)
                    + (alpha_m_delta * dt) * structure_m
                    + (alpha_n_delta * dt) * structure_n
            }
        }
    }
}
