//! Boundary-condition engine
//!
//! Two layers: load-time folding of the constant BC kinds into per-node
//! tables (`BcTables`), and per-step evaluation of the time-dependent kinds
//! (displacement ramps, temperature-dependent perfusion).
//!
//! Kinds and their effects:
//! - `Disp(axis, u, nodes)`: per step, prescribes u·(step+1)·Δt/total_t
//! - `FixP(axis|all, nodes)`: pins mechanical DOFs to zero
//! - `Gravity(axis, g)`: adds mass·g/4 to every corner DOF
//! - `HFlux(q, nodes)`: adds q to the node's base external heat
//! - `BodyHFlux(q, tets)`: adds q·V₀/4 to each corner of the listed tets
//! - `Metabo(q)`: adds q·V₀/4 to each corner of every tet
//! - `Perfu(w_b, c_b, T_ref, tets)`: per step, subtracts
//!   w_b·V₀/4·c_b·(T − T_ref) from the base heat
//! - `FixT(T*, nodes)`: prescribes the node temperature

use crate::fem::element::Tet4;
use crate::fem::state::SolverState;
use crate::model::Model;

/// Coordinate axis of a mechanical boundary condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    /// Parse an axis token from a BC stanza.
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        }
    }
}

/// A prescribed-displacement entry: the target is reached at t = total_t
#[derive(Debug, Clone, Copy)]
pub struct DispEntry {
    pub dof: usize,
    pub target: f64,
}

/// A perfusion heat-sink entry, folded to nodal form at load time
#[derive(Debug, Clone, Copy)]
pub struct PerfusionEntry {
    pub node: usize,
    /// Σ w_b·V₀/4·c_b over the stanza's tets incident to this node
    pub coeff: f64,
    pub t_ref: f64,
}

/// Precomputed boundary-condition tables
///
/// Init-time kinds are already folded into constant nodal vectors; the
/// per-step kinds keep compact entry lists evaluated every step.
#[derive(Debug, Clone)]
pub struct BcTables {
    /// Constant external nodal forces (gravity), sized 3N
    pub external_f0: Vec<f64>,
    /// Constant external nodal heat (HFlux + BodyHFlux + Metabo), sized N
    pub external_q0: Vec<f64>,
    pub disp: Vec<DispEntry>,
    /// Mechanical DOFs pinned to zero
    pub fixed_dofs: Vec<usize>,
    pub fixed_temps: Vec<(usize, f64)>,
    pub perfusion: Vec<PerfusionEntry>,
    /// Number of BC stanzas read, for the model summary
    pub num_stanzas: usize,
}

impl BcTables {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            external_f0: vec![0.0; num_nodes * 3],
            external_q0: vec![0.0; num_nodes],
            disp: Vec::new(),
            fixed_dofs: Vec::new(),
            fixed_temps: Vec::new(),
            perfusion: Vec::new(),
            num_stanzas: 0,
        }
    }

    pub fn add_displacement(&mut self, node: usize, axis: Axis, target: f64) {
        self.disp.push(DispEntry {
            dof: node * 3 + axis as usize,
            target,
        });
    }

    pub fn add_fixed_dof(&mut self, node: usize, axis: Axis) {
        self.fixed_dofs.push(node * 3 + axis as usize);
    }

    pub fn add_fixed_node(&mut self, node: usize) {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            self.add_fixed_dof(node, axis);
        }
    }

    /// Gravity acting along one axis: mass·g/4 on each corner DOF.
    pub fn add_gravity(&mut self, axis: Axis, g: f64, elements: &[Tet4]) {
        for tet in elements {
            for &node in &tet.nodes {
                self.external_f0[node * 3 + axis as usize] += tet.mass * g / 4.0;
            }
        }
    }

    pub fn add_heat_flux(&mut self, node: usize, q: f64) {
        self.external_q0[node] += q;
    }

    /// Volumetric heat flux over the listed tets: q·V₀/4 per corner.
    pub fn add_body_heat_flux(&mut self, q: f64, tet_ids: &[usize], elements: &[Tet4]) {
        for &id in tet_ids {
            let tet = &elements[id];
            for &node in &tet.nodes {
                self.external_q0[node] += q * tet.volume / 4.0;
            }
        }
    }

    /// Metabolic heat generation over the whole mesh.
    pub fn add_metabolic(&mut self, q: f64, elements: &[Tet4]) {
        for tet in elements {
            for &node in &tet.nodes {
                self.external_q0[node] += q * tet.volume / 4.0;
            }
        }
    }

    /// Pennes-style perfusion over the listed tets. The per-node coefficient
    /// w_b·V₀/4·c_b is accumulated here; the temperature-dependent sink is
    /// evaluated every step. Entries keep file order, so for a node named by
    /// two stanzas the later one wins at evaluation time.
    pub fn add_perfusion(
        &mut self,
        w_b: f64,
        c_b: f64,
        t_ref: f64,
        tet_ids: &[usize],
        elements: &[Tet4],
        num_nodes: usize,
    ) {
        let mut nodal_coeff = vec![0.0; num_nodes];
        for &id in tet_ids {
            let tet = &elements[id];
            for &node in &tet.nodes {
                nodal_coeff[node] += w_b * tet.volume / 4.0 * c_b;
            }
        }
        for (node, &coeff) in nodal_coeff.iter().enumerate() {
            if coeff != 0.0 {
                self.perfusion.push(PerfusionEntry { node, coeff, t_ref });
            }
        }
    }

    pub fn add_fixed_temperature(&mut self, node: usize, t: f64) {
        self.fixed_temps.push((node, t));
    }
}

/// Apply the constant boundary conditions to a fresh solver state.
pub fn apply_initial(model: &Model, state: &mut SolverState) {
    state.external_f.copy_from_slice(&model.bc.external_f0);
    state.external_q0.copy_from_slice(&model.bc.external_q0);
    state.external_q.copy_from_slice(&model.bc.external_q0);

    for &dof in &model.bc.fixed_dofs {
        state.fixed_dof[dof] = true;
    }
    for &(node, t) in &model.bc.fixed_temps {
        state.fixed_temp[node] = true;
        state.fixed_temp_value[node] = t;
    }
}

/// Evaluate the time-dependent boundary conditions for one step.
///
/// Displacement targets ramp linearly from zero at t = 0 to the full value
/// at t = total_t; the factor (step+1)·Δt/total_t may exceed one on the last
/// step when total_t is not an integer multiple of Δt (preserved behavior).
pub fn apply_time_dependent(model: &Model, state: &mut SolverState, step: usize) {
    let factor = (step as f64 + 1.0) * model.dt / model.total_time;
    for entry in &model.bc.disp {
        state.disp_target[entry.dof] = entry.target * factor;
    }

    for entry in &model.bc.perfusion {
        state.external_q[entry.node] = state.external_q0[entry.node]
            - entry.coeff * (state.curr_t[entry.node] - entry.t_ref);
    }
}
