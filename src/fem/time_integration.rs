/// Explicit time integration for the coupled problem
///
/// Each step is two fork-join phases: the element pass (stress, conduction,
/// per-corner scatter) followed by the node pass, which gathers incident
/// element contributions, applies boundary conditions, and advances the
/// displacement field by central difference with mass-proportional damping
/// and the temperature field by forward Euler:
///
///   next_U = c₁·(F_ext − F_int) + c₂·curr_U + c₃·prev_U
///   next_T = curr_T + A·(Q_ext − Q_int)
///
/// Explicit integrators lose stability silently, so every freshly computed
/// value is checked for finiteness; a single non-finite result aborts the
/// run before the histories rotate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::bc;
use crate::error::SimulationError;
use crate::fem::assembly::Assembler;
use crate::fem::state::SolverState;
use crate::model::Model;

/// Advance the coupled fields by one step.
///
/// Precondition: curr_U / curr_T hold the state at time n·Δt and prev_U the
/// state one step earlier. On success the histories are rotated; on
/// divergence they are left untouched and the step is the last.
pub fn advance_step(
    model: &Model,
    state: &mut SolverState,
    step: usize,
) -> Result<(), SimulationError> {
    bc::apply_time_dependent(model, state, step);

    Assembler::element_pass(model, state);

    // Monotonic one-way flag; concurrent relaxed stores are benign
    let diverged = AtomicBool::new(false);

    {
        let adjacency = &model.mesh.adjacency;
        let SolverState {
            external_f,
            disp_target,
            cd_const1,
            cd_const2,
            cd_const3,
            prev_u,
            curr_u,
            next_u,
            external_q,
            fixed_temp_value,
            thermal_const,
            curr_t,
            next_t,
            fixed_dof,
            fixed_temp,
            elements,
            ..
        } = state;
        let external_f: &[f64] = external_f;
        let disp_target: &[f64] = disp_target;
        let cd_const1: &[f64] = cd_const1;
        let cd_const2: &[f64] = cd_const2;
        let cd_const3: &[f64] = cd_const3;
        let prev_u: &[f64] = prev_u;
        let curr_u: &[f64] = curr_u;
        let external_q: &[f64] = external_q;
        let thermal_const: &[f64] = thermal_const;
        let curr_t: &[f64] = curr_t;
        let fixed_temp_value: &[f64] = fixed_temp_value;
        let fixed_dof: &[bool] = fixed_dof;
        let fixed_temp: &[bool] = fixed_temp;
        let elements = &elements[..];

        next_u
            .par_chunks_mut(3)
            .zip(next_t.par_iter_mut())
            .enumerate()
            .for_each(|(node, (u_next, t_next))| {
                let (f_int, q_int) = Assembler::gather_node(adjacency, elements, node);

                for j in 0..3 {
                    let dof = node * 3 + j;
                    u_next[j] = if disp_target[dof] != 0.0 {
                        // Prescribed (ramped) displacement
                        disp_target[dof]
                    } else if fixed_dof[dof] {
                        0.0
                    } else {
                        let u = cd_const1[dof] * (external_f[dof] - f_int[j])
                            + cd_const2[dof] * curr_u[dof]
                            + cd_const3[dof] * prev_u[dof];
                        if !u.is_finite() {
                            diverged.store(true, Ordering::Relaxed);
                        }
                        u
                    };
                }

                *t_next = if fixed_temp[node] {
                    fixed_temp_value[node]
                } else {
                    let t = curr_t[node] + thermal_const[node] * (external_q[node] - q_int);
                    if !t.is_finite() {
                        diverged.store(true, Ordering::Relaxed);
                    }
                    t
                };
            });
    }

    if diverged.load(Ordering::Relaxed) {
        return Err(SimulationError::Diverged { step });
    }

    state.rotate_histories();
    Ok(())
}

/// Run the full simulation loop.
///
/// Initializes the solver state, applies the constant boundary conditions,
/// and advances num_steps steps with 10% progress reporting and wall-clock
/// timing. Returns the final state; curr_U / curr_T hold the end-of-run
/// fields.
pub fn run_simulation(model: &Model) -> Result<SolverState, SimulationError> {
    let mut state = SolverState::new(model);
    bc::apply_initial(model, &mut state);

    println!("\n\tusing {} threads", rayon::current_num_threads());
    println!("\tcomputing...");

    let start = Instant::now();
    let mut progress = 0;
    for step in 0..model.num_steps {
        let pct = (step + 1) as f64 / model.num_steps as f64 * 100.0;
        if pct >= (progress + 10) as f64 {
            progress += 10;
            println!("\t\t\t({}%)", progress);
        }
        advance_step(model, &mut state, step)?;
    }

    println!(
        "\n\tComputation time:\t{} ms",
        start.elapsed().as_millis()
    );
    Ok(state)
}
