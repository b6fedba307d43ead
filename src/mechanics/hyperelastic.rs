/// Hyperelastic constitutive models
///
/// Implements the 2nd Piola-Kirchhoff stress for nearly-incompressible
/// finite-strain materials. Only the isochoric invariants I₁ (and I₄ for the
/// fibre-reinforced model) plus the volumetric term are needed; no
/// fourth-order tangent is ever materialized, since the explicit integrator
/// works from forces alone.

use nalgebra::{Matrix3, Vector3};

/// Hyperelastic material model for a tetrahedral element
///
/// # References
/// - Bonet & Wood, "Nonlinear Continuum Mechanics for Finite Element Analysis"
/// - Holzapfel, "Nonlinear Solid Mechanics"
#[derive(Debug, Clone)]
pub enum Hyperelastic {
    /// Two-parameter isotropic Neo-Hookean model
    NeoHookean {
        /// Shear modulus μ (Pa)
        mu: f64,
        /// Bulk modulus K (Pa)
        bulk: f64,
    },
    /// Transversely isotropic model with one preferred fibre direction
    TransverselyIsotropic {
        /// Shear modulus μ (Pa)
        mu: f64,
        /// Bulk modulus K (Pa)
        bulk: f64,
        /// Fibre stiffness η (Pa)
        eta: f64,
        /// Structure tensor A = a⊗a of the unit fibre direction
        structure: Matrix3<f64>,
    },
}

impl Hyperelastic {
    /// Create a Neo-Hookean material.
    pub fn neo_hookean(mu: f64, bulk: f64) -> Self {
        Self::NeoHookean { mu, bulk }
    }

    /// Create a transversely isotropic material.
    ///
    /// The fibre direction is normalized to unit length before the structure
    /// tensor is formed, so the input need not be normalized.
    pub fn transversely_isotropic(mu: f64, bulk: f64, eta: f64, fibre: Vector3<f64>) -> Self {
        let a = fibre.normalize();
        Self::TransverselyIsotropic {
            mu,
            bulk,
            eta,
            structure: a * a.transpose(),
        }
    }

    /// Evaluate the 2nd Piola-Kirchhoff stress.
    ///
    /// # Arguments
    /// * `c` - Right Cauchy-Green tensor C = XᵀX (elastic part)
    /// * `inv_c` - Inverse of C
    /// * `j` - Jacobian J = det(X) = √det(C)
    ///
    /// # Returns
    /// Symmetric 3×3 stress tensor S
    pub fn second_piola_kirchhoff(
        &self,
        c: &Matrix3<f64>,
        inv_c: &Matrix3<f64>,
        j: f64,
    ) -> Matrix3<f64> {
        let j23 = j.powf(-2.0 / 3.0); // J^(-2/3)
        let i1 = c.trace();

        match self {
            Self::NeoHookean { mu, bulk } => {
                // S = J⁻²ᐟ³μ·I + (−J⁻²ᐟ³μ·I₁/3 + K·J·(J−1))·C⁻¹
                let c_iso = j23 * mu;
                let c_vol = -c_iso * i1 / 3.0 + bulk * j * (j - 1.0);
                c_vol * inv_c + Matrix3::from_diagonal_element(c_iso)
            }
            Self::TransverselyIsotropic {
                mu,
                bulk,
                eta,
                structure,
            } => {
                // I₄ = A : C, Î₄ = J⁻²ᐟ³·I₄
                let i4 = structure.dot(c);
                let i4_iso = j23 * i4;
                let c_iso = j23 * mu;
                let fibre = eta * (i4_iso - 1.0);
                let c_fibre = 2.0 * j23 * fibre;
                let c_vol = -(c_iso * i1 + 2.0 * fibre * i4_iso) / 3.0 + bulk * j * (j - 1.0);
                c_vol * inv_c + c_fibre * structure + Matrix3::from_diagonal_element(c_iso)
            }
        }
    }
}
