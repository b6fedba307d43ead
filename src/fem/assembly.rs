/// Element pass and nodal gather of the coupled update
///
/// Assembly is scatter-then-gather: the element pass writes each corner
/// contribution into the element's own scratch slot, and the node pass sums
/// the slots of incident elements through the connectivity index. No two
/// tasks ever write the same cell, so both passes run lock-free under rayon
/// and results are bit-reproducible across thread counts.

use nalgebra::{Matrix3, Matrix3x4};
use rayon::prelude::*;

use crate::fem::element::Tet4;
use crate::fem::state::{ElementScratch, SolverState};
use crate::linalg::invert3;
use crate::mesh::NodeElementMap;
use crate::model::Model;

pub struct Assembler;

impl Assembler {
    /// Element pass: evaluate stress and conduction for every tetrahedron
    /// in the current configuration and scatter the per-corner internal
    /// forces and heat flows into the element scratch.
    ///
    /// Reads curr_u and curr_t; each parallel task writes only its own
    /// `ElementScratch`. The implicit join at the end is the barrier that
    /// the node pass relies on.
    pub fn element_pass(model: &Model, state: &mut SolverState) {
        let t0 = model.reference_temperature;
        let SolverState {
            elements,
            curr_u,
            curr_t,
            ..
        } = state;
        let curr_u: &[f64] = curr_u;
        let curr_t: &[f64] = curr_t;

        elements
            .par_iter_mut()
            .zip(model.elements.par_iter())
            .for_each(|(scratch, tet)| Self::element_kernel(tet, t0, curr_u, curr_t, scratch));
    }

    /// Per-element kernel: deformation gradient, thermal-expansion split,
    /// 2nd PK stress with pull-back, internal corner forces, deformed
    /// conduction matrix, and corner heat flows.
    #[allow(non_snake_case)]
    fn element_kernel(
        tet: &Tet4,
        t0: f64,
        curr_u: &[f64],
        curr_t: &[f64],
        scratch: &mut ElementScratch,
    ) {
        // Nodal displacements of this element, one corner per column
        let mut u = Matrix3x4::zeros();
        for (m, &node) in tet.nodes.iter().enumerate() {
            for n in 0..3 {
                u[(n, m)] = curr_u[node * 3 + n];
            }
        }

        // Deformation gradient X = I + u·DHDXᵀ
        let X = u * tet.dhdx.transpose() + Matrix3::identity();
        scratch.def_grad = X;

        // Multiplicative thermal-expansion split: X = X_el·X_exp, evaluated
        // at the mean corner temperature
        let mut expansion_pullback = None;
        let X_el = match &tet.expansion {
            Some(expansion) => {
                let t_mean = tet.nodes.iter().map(|&n| curr_t[n]).sum::<f64>() / 4.0;
                let X_exp = expansion.gradient(t_mean - t0);
                scratch.expan_grad = X_exp;
                let (inv_X_exp, j_exp) = invert3(&X_exp);
                expansion_pullback = Some((inv_X_exp, j_exp));
                X * inv_X_exp
            }
            None => X,
        };

        // Right Cauchy-Green tensor of the elastic part; det(C) = J²
        let C = X_el.transpose() * X_el;
        let (inv_C, j_sq) = invert3(&C);
        let j = j_sq.sqrt();

        let mut S = tet.material.second_piola_kirchhoff(&C, &inv_C, j);
        if let Some((inv_X_exp, j_exp)) = expansion_pullback {
            // Pull the stress back to the reference configuration so the
            // internal force keeps its reference-integral form
            S = j_exp * (inv_X_exp * S * inv_X_exp.transpose());
        }
        scratch.stress = S;

        // Internal force per corner: F = X·S·V₀·DHDX, column m acts on
        // corner m
        let f = X * S * tet.dhdx * tet.volume;
        for m in 0..4 {
            for n in 0..3 {
                scratch.corner_forces[m * 3 + n] = f[(n, m)];
            }
        }

        // Deformed shape-function gradients and volume
        let (inv_X, j_def) = invert3(&X);
        let dhdx = inv_X.transpose() * tet.dhdx;
        scratch.dhdx = dhdx;
        scratch.volume = tet.volume * j_def;

        // Deformed conduction matrix and conductive heat flow per corner
        let K = tet
            .thermal
            .conductivity
            .conduction_matrix(&dhdx, scratch.volume);
        scratch.conduction = K;
        for m in 0..4 {
            scratch.corner_heat[m] = (0..4)
                .map(|k| K[(m, k)] * curr_t[tet.nodes[k]])
                .sum();
        }
    }

    /// Gather the internal force and heat flow of one node by summing the
    /// per-corner slots of every incident element.
    pub fn gather_node(
        adjacency: &NodeElementMap,
        elements: &[ElementScratch],
        node: usize,
    ) -> ([f64; 3], f64) {
        let mut force = [0.0; 3];
        let mut heat = 0.0;
        for &(elem_id, corner) in adjacency.incident(node) {
            let scratch = &elements[elem_id];
            for n in 0..3 {
                force[n] += scratch.corner_forces[corner * 3 + n];
            }
            heat += scratch.corner_heat[corner];
        }
        (force, heat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanics::Hyperelastic;
    use crate::mesh::Tet4Element;
    use crate::physics::{Conductivity, ThermalMaterial};
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn unit_tet(expansion: Option<crate::mechanics::ThermalExpansion>) -> Tet4 {
        Tet4::new(
            0,
            [0, 1, 2, 3],
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            1000.0,
            Hyperelastic::neo_hookean(1.0, 10.0),
            ThermalMaterial::new(3600.0, Conductivity::Isotropic { k: 0.5 }),
            expansion,
        )
        .unwrap()
    }

    #[test]
    fn test_undeformed_element_produces_no_forces() {
        let tet = unit_tet(None);
        let curr_u = vec![0.0; 12];
        let curr_t = vec![37.0; 4];
        let mut scratch = ElementScratch::default();

        Assembler::element_kernel(&tet, 37.0, &curr_u, &curr_t, &mut scratch);

        for &f in &scratch.corner_forces {
            assert_relative_eq!(f, 0.0, epsilon = 1e-12);
        }
        assert_relative_eq!(scratch.volume, tet.volume, epsilon = 1e-12);
        // Deformed conduction equals the reference matrix at X = I
        for i in 0..4 {
            for j in 0..4 {
                assert_relative_eq!(
                    scratch.conduction[(i, j)],
                    tet.conduction[(i, j)],
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_uniform_temperature_produces_no_heat_flow() {
        let tet = unit_tet(None);
        let curr_u = vec![0.0; 12];
        let curr_t = vec![41.5; 4];
        let mut scratch = ElementScratch::default();

        Assembler::element_kernel(&tet, 37.0, &curr_u, &curr_t, &mut scratch);

        for &q in &scratch.corner_heat {
            assert_relative_eq!(q, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_internal_forces_are_self_equilibrated() {
        let tet = unit_tet(None);
        // Stretch along x plus a little shear
        let mut curr_u = vec![0.0; 12];
        curr_u[3] = 0.1; // node 1, x
        curr_u[7] = 0.05; // node 2, y
        let curr_t = vec![37.0; 4];
        let mut scratch = ElementScratch::default();

        Assembler::element_kernel(&tet, 37.0, &curr_u, &curr_t, &mut scratch);

        // Σ over corners of the internal force vanishes because the
        // shape-function gradients sum to zero
        for n in 0..3 {
            let total: f64 = (0..4).map(|m| scratch.corner_forces[m * 3 + n]).sum();
            assert_relative_eq!(total, 0.0, epsilon = 1e-12);
        }
        // Stretch resisted: the pulled node is dragged back along −x by
        // next_U = c₁(F_ext − F_int) + ..., so its internal force is
        // positive along x
        assert!(scratch.corner_forces[3] > 0.0);
    }

    #[test]
    fn test_stress_scratch_is_symmetric() {
        let tet = unit_tet(None);
        let mut curr_u = vec![0.0; 12];
        curr_u[3] = 0.08;
        curr_u[11] = -0.03; // node 3, z
        let curr_t = vec![37.0; 4];
        let mut scratch = ElementScratch::default();

        Assembler::element_kernel(&tet, 37.0, &curr_u, &curr_t, &mut scratch);

        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(
                    scratch.stress[(i, j)],
                    scratch.stress[(j, i)],
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_heated_expanding_element_pushes_corners_outward() {
        let tet = unit_tet(Some(crate::mechanics::ThermalExpansion::isotropic(1e-3)));
        let curr_u = vec![0.0; 12];
        // 10 degrees above reference with zero displacement: the element
        // wants to grow, so the elastic state is compressed
        let curr_t = vec![47.0; 4];
        let mut scratch = ElementScratch::default();

        Assembler::element_kernel(&tet, 37.0, &curr_u, &curr_t, &mut scratch);

        // The apex (node 3, gradient +z) must be driven outward along +z by
        // −F_int, so its internal z-force is negative
        assert!(scratch.corner_forces[3 * 3 + 2] < 0.0);
        // Expansion gradient recorded for the step
        let lambda = 1.0 + 1e-3 * 10.0;
        assert_relative_eq!(scratch.expan_grad[(0, 0)], lambda, epsilon = 1e-12);
    }

    #[test]
    fn test_gather_sums_shared_corner_contributions() {
        let elements = vec![
            Tet4Element::new([0, 1, 2, 3]),
            Tet4Element::new([1, 2, 3, 4]),
        ];
        let adjacency = NodeElementMap::build(5, &elements);

        let mut scratch = vec![ElementScratch::default(); 2];
        // Node 1 is corner 1 of element 0 and corner 0 of element 1
        scratch[0].corner_forces[3] = 2.0;
        scratch[0].corner_heat[1] = 5.0;
        scratch[1].corner_forces[0] = 3.0;
        scratch[1].corner_heat[0] = 7.0;

        let (force, heat) = Assembler::gather_node(&adjacency, &scratch, 1);
        assert_relative_eq!(force[0], 5.0);
        assert_relative_eq!(force[1], 0.0);
        assert_relative_eq!(heat, 12.0);
    }
}
