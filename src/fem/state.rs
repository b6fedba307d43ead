/// Mutable solver state
///
/// The `Model` stays read-only for the whole run; everything that changes
/// per step lives here. Nodal vectors are sized 3N (mechanical DOFs) or N
/// (thermal DOFs); per-element scratch is one `ElementScratch` per element,
/// indexed by element id, so the element pass can hand each task exclusive
/// ownership of its own slot.

use nalgebra::{Matrix3, Matrix3x4, Matrix4};

use crate::model::Model;

/// Per-element per-step scratch
///
/// Written only by the owning element in the element pass, read by the node
/// pass through the connectivity index.
#[derive(Debug, Clone)]
pub struct ElementScratch {
    /// Deformation gradient X = I + ∇u
    pub def_grad: Matrix3<f64>,
    /// Thermal-expansion deformation gradient X_exp
    pub expan_grad: Matrix3<f64>,
    /// 2nd Piola-Kirchhoff stress S
    pub stress: Matrix3<f64>,
    /// Shape-function gradients in the deformed configuration
    pub dhdx: Matrix3x4<f64>,
    /// Deformed conduction matrix
    pub conduction: Matrix4<f64>,
    /// Deformed volume v = V₀·J
    pub volume: f64,
    /// Internal force on each corner, laid out corner-major: [m*3 + n]
    pub corner_forces: [f64; 12],
    /// Conductive heat flow out of each corner
    pub corner_heat: [f64; 4],
}

impl Default for ElementScratch {
    fn default() -> Self {
        Self {
            def_grad: Matrix3::zeros(),
            expan_grad: Matrix3::zeros(),
            stress: Matrix3::zeros(),
            dhdx: Matrix3x4::zeros(),
            conduction: Matrix4::zeros(),
            volume: 0.0,
            corner_forces: [0.0; 12],
            corner_heat: [0.0; 4],
        }
    }
}

/// Nodal state vectors and precomputed integration constants
#[derive(Debug, Clone)]
pub struct SolverState {
    /// External nodal forces (constant part, from gravity)
    pub external_f: Vec<f64>,
    /// Ramped displacement targets for the current step; non-zero entries
    /// override the integrated displacement
    pub disp_target: Vec<f64>,

    /// Central-difference constants c₁ = 1/(α·m/2Δt + m/Δt²)
    pub cd_const1: Vec<f64>,
    /// c₂ = 2m·c₁/Δt²
    pub cd_const2: Vec<f64>,
    /// c₃ = α·m·c₁/2Δt − c₂/2
    pub cd_const3: Vec<f64>,

    /// Displacement two steps back, one step back, and being computed
    pub prev_u: Vec<f64>,
    pub curr_u: Vec<f64>,
    pub next_u: Vec<f64>,

    /// External nodal heat loads: per-step value and constant base
    pub external_q: Vec<f64>,
    pub external_q0: Vec<f64>,

    /// Prescribed temperatures for FixT nodes
    pub fixed_temp_value: Vec<f64>,
    /// Thermal integration constant A = Δt/(m_T·c) per node
    pub thermal_const: Vec<f64>,

    pub curr_t: Vec<f64>,
    pub next_t: Vec<f64>,

    /// Mechanical DOFs pinned to zero
    pub fixed_dof: Vec<bool>,
    /// Nodes with prescribed temperature
    pub fixed_temp: Vec<bool>,

    /// Per-element scratch, indexed by element id
    pub elements: Vec<ElementScratch>,
}

impl SolverState {
    /// Allocate the state for a model and precompute the lumped-mass
    /// integration constants.
    pub fn new(model: &Model) -> Self {
        let num_m_dofs = model.num_mechanical_dofs();
        let num_t_dofs = model.num_thermal_dofs();

        // Lumped nodal mass: each element spreads its mass equally over the
        // four corners
        let mut nodal_mass = vec![0.0; num_t_dofs];
        for tet in &model.elements {
            for &node in &tet.nodes {
                nodal_mass[node] += tet.mass / 4.0;
            }
        }

        let dt = model.dt;
        let alpha = model.damping;
        let mut cd_const1 = vec![0.0; num_m_dofs];
        let mut cd_const2 = vec![0.0; num_m_dofs];
        let mut cd_const3 = vec![0.0; num_m_dofs];
        for node in 0..num_t_dofs {
            let m = nodal_mass[node];
            let c1 = 1.0 / (alpha * m / 2.0 / dt + m / dt / dt);
            let c2 = 2.0 * m * c1 / dt / dt;
            let c3 = alpha * m * c1 / 2.0 / dt - c2 / 2.0;
            for j in 0..3 {
                cd_const1[node * 3 + j] = c1;
                cd_const2[node * 3 + j] = c2;
                cd_const3[node * 3 + j] = c3;
            }
        }

        // Forward-Euler thermal constant A = Δt/(m_T·c)
        let thermal_const = nodal_mass
            .iter()
            .map(|&m| dt / (m * model.specific_heat))
            .collect();

        Self {
            external_f: vec![0.0; num_m_dofs],
            disp_target: vec![0.0; num_m_dofs],
            cd_const1,
            cd_const2,
            cd_const3,
            prev_u: vec![0.0; num_m_dofs],
            curr_u: vec![0.0; num_m_dofs],
            next_u: vec![0.0; num_m_dofs],
            external_q: vec![0.0; num_t_dofs],
            external_q0: vec![0.0; num_t_dofs],
            fixed_temp_value: vec![0.0; num_t_dofs],
            thermal_const,
            curr_t: vec![model.reference_temperature; num_t_dofs],
            next_t: vec![model.reference_temperature; num_t_dofs],
            fixed_dof: vec![false; num_m_dofs],
            fixed_temp: vec![false; num_t_dofs],
            elements: vec![ElementScratch::default(); model.num_elements()],
        }
    }

    /// Shift the time histories after a completed step: the buffer holding
    /// the oldest data is reused as scratch for the next one.
    pub fn rotate_histories(&mut self) {
        std::mem::swap(&mut self.prev_u, &mut self.curr_u);
        std::mem::swap(&mut self.curr_u, &mut self.next_u);
        std::mem::swap(&mut self.curr_t, &mut self.next_t);
    }
}
