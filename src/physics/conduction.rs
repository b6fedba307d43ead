/// Heat-conduction material models
///
/// The conductivity tensor D enters the element conduction matrix
/// K = DHDxᵀ · D · DHDx · v. In the reference configuration this is computed
/// once per element; in the deformed configuration it is rebuilt every step
/// from the deformed shape-function gradients.

use nalgebra::{Matrix3, Matrix3x4, Matrix4};

/// Conductivity model for a tetrahedral element
#[derive(Debug, Clone)]
pub enum Conductivity {
    /// Single conductivity k in all directions, D = k·I
    Isotropic { k: f64 },
    /// Diagonal conductivity, D = diag(k₁₁, k₂₂, k₃₃)
    Orthotropic { k11: f64, k22: f64, k33: f64 },
    /// Full symmetric conductivity tensor
    Anisotropic { d: Matrix3<f64> },
}

impl Conductivity {
    /// Symmetric anisotropic conductivity from the upper-triangle entries.
    pub fn anisotropic(k11: f64, k12: f64, k13: f64, k22: f64, k23: f64, k33: f64) -> Self {
        Self::Anisotropic {
            d: Matrix3::new(k11, k12, k13, k12, k22, k23, k13, k23, k33),
        }
    }

    /// The 3×3 conductivity tensor D.
    pub fn tensor(&self) -> Matrix3<f64> {
        match self {
            Self::Isotropic { k } => Matrix3::from_diagonal_element(*k),
            Self::Orthotropic { k11, k22, k33 } => {
                Matrix3::new(*k11, 0.0, 0.0, 0.0, *k22, 0.0, 0.0, 0.0, *k33)
            }
            Self::Anisotropic { d } => *d,
        }
    }

    /// Element conduction matrix DHDᵀ · D · DHD · volume.
    ///
    /// For the isotropic model the tensor product collapses to a scalar
    /// scaling of DHDᵀ·DHD, which skips a 3×3 by 3×4 multiply in the per-step
    /// recomputation.
    pub fn conduction_matrix(&self, dhd: &Matrix3x4<f64>, volume: f64) -> Matrix4<f64> {
        match self {
            Self::Isotropic { k } => (dhd.transpose() * dhd) * (volume * k),
            _ => dhd.transpose() * self.tensor() * dhd * volume,
        }
    }
}

/// Thermal material: specific heat capacity plus conductivity
#[derive(Debug, Clone)]
pub struct ThermalMaterial {
    /// Specific heat capacity c (J/(kg·K))
    pub specific_heat: f64,
    pub conductivity: Conductivity,
}

impl ThermalMaterial {
    pub fn new(specific_heat: f64, conductivity: Conductivity) -> Self {
        Self {
            specific_heat,
            conductivity,
        }
    }
}
