/// Reference-configuration element record for the linear tetrahedron
///
/// Everything that depends only on the undeformed mesh is computed once at
/// construction: volume, lumped mass, material shape-function gradients, and
/// the reference conduction matrix. The deformed counterparts are recomputed
/// every step and live in the per-element scratch of the solver state.

use nalgebra::{Matrix3x4, Matrix4, Point3};

use crate::error::SimulationError;
use crate::linalg::try_invert3;
use crate::mechanics::{Hyperelastic, ThermalExpansion};
use crate::physics::ThermalMaterial;

/// Shape-function gradients of the reference tetrahedron in natural
/// coordinates, DHDr. Constant for all linear tets.
pub fn reference_gradients() -> Matrix3x4<f64> {
    Matrix3x4::new(
        -1.0, 1.0, 0.0, 0.0, //
        -1.0, 0.0, 1.0, 0.0, //
        -1.0, 0.0, 0.0, 1.0,
    )
}

/// Immutable per-element reference data
#[derive(Debug, Clone)]
pub struct Tet4 {
    /// Element index (0-based)
    pub id: usize,
    /// Global node indices; the ordering fixes the element orientation
    pub nodes: [usize; 4],
    /// Reference volume V₀ = det(J₀)/6
    pub volume: f64,
    /// Element mass ρ·V₀, split equally over the corners for lumping
    pub mass: f64,
    /// Shape-function gradients in material coordinates, DHDX = J₀⁻¹·DHDr
    pub dhdx: Matrix3x4<f64>,
    /// Reference conduction matrix K₀ = DHDXᵀ·D·DHDX·V₀ (symmetric)
    pub conduction: Matrix4<f64>,
    pub material: Hyperelastic,
    pub thermal: ThermalMaterial,
    pub expansion: Option<ThermalExpansion>,
}

impl Tet4 {
    /// Build the reference record from four node coordinates.
    ///
    /// Fails with `DegenerateElement` when the reference Jacobian is
    /// singular or its determinant is not strictly positive (inverted or
    /// collapsed vertex ordering).
    pub fn new(
        id: usize,
        nodes: [usize; 4],
        coords: [Point3<f64>; 4],
        density: f64,
        material: Hyperelastic,
        thermal: ThermalMaterial,
        expansion: Option<ThermalExpansion>,
    ) -> Result<Self, SimulationError> {
        let mut n_coords = Matrix3x4::zeros();
        for (m, p) in coords.iter().enumerate() {
            n_coords[(0, m)] = p.x;
            n_coords[(1, m)] = p.y;
            n_coords[(2, m)] = p.z;
        }

        let dhdr = reference_gradients();
        let j0 = dhdr * n_coords.transpose();
        let (inv_j0, det_j0) =
            try_invert3(&j0).map_err(|_| SimulationError::DegenerateElement { id })?;
        if det_j0 <= 0.0 {
            return Err(SimulationError::DegenerateElement { id });
        }

        let volume = det_j0 / 6.0;
        let dhdx = inv_j0 * dhdr;
        let conduction = thermal.conductivity.conduction_matrix(&dhdx, volume);

        Ok(Self {
            id,
            nodes,
            volume,
            mass: density * volume,
            dhdx,
            conduction,
            material,
            thermal,
            expansion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Conductivity;
    use approx::assert_relative_eq;

    fn unit_tet_coords() -> [Point3<f64>; 4] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ]
    }

    fn make_unit_tet() -> Tet4 {
        Tet4::new(
            0,
            [0, 1, 2, 3],
            unit_tet_coords(),
            1000.0,
            Hyperelastic::neo_hookean(1.0, 10.0),
            ThermalMaterial::new(3600.0, Conductivity::Isotropic { k: 0.5 }),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_unit_tet_volume_and_mass() {
        let tet = make_unit_tet();
        assert_relative_eq!(tet.volume, 1.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(tet.mass, 1000.0 / 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unit_tet_shape_gradients() {
        // For the unit tet the natural and material coordinates coincide,
        // so DHDX equals DHDr
        let tet = make_unit_tet();
        let dhdr = reference_gradients();
        for i in 0..3 {
            for m in 0..4 {
                assert_relative_eq!(tet.dhdx[(i, m)], dhdr[(i, m)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_reference_conduction_is_symmetric() {
        let tet = make_unit_tet();
        for i in 0..4 {
            for j in 0..4 {
                assert_relative_eq!(
                    tet.conduction[(i, j)],
                    tet.conduction[(j, i)],
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_inverted_vertex_ordering_is_degenerate() {
        // Swapping two vertices flips the orientation and the Jacobian sign
        let mut coords = unit_tet_coords();
        coords.swap(1, 2);
        let result = Tet4::new(
            0,
            [0, 2, 1, 3],
            coords,
            1000.0,
            Hyperelastic::neo_hookean(1.0, 10.0),
            ThermalMaterial::new(3600.0, Conductivity::Isotropic { k: 0.5 }),
            None,
        );
        assert!(matches!(
            result,
            Err(SimulationError::DegenerateElement { id: 0 })
        ));
    }

    #[test]
    fn test_coplanar_vertices_are_degenerate() {
        let coords = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.5, 0.5, 0.0),
        ];
        let result = Tet4::new(
            1,
            [0, 1, 2, 3],
            coords,
            1000.0,
            Hyperelastic::neo_hookean(1.0, 10.0),
            ThermalMaterial::new(3600.0, Conductivity::Isotropic { k: 0.5 }),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_scaled_tet_volume() {
        // Doubling every edge multiplies the volume by 8
        let coords = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
        ];
        let tet = Tet4::new(
            0,
            [0, 1, 2, 3],
            coords,
            1.0,
            Hyperelastic::neo_hookean(1.0, 10.0),
            ThermalMaterial::new(1.0, Conductivity::Isotropic { k: 1.0 }),
            None,
        )
        .unwrap();
        assert_relative_eq!(tet.volume, 8.0 / 6.0, epsilon = 1e-12);
    }
}
