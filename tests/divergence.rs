//! Divergence detection: a time step far above the stability limit of the
//! explicit integrator must be caught as a non-finite field and abort the
//! run with a non-success result instead of producing garbage output.

mod common;

use tissue_simulator::{run_simulation, SimulationError};

const STIFF_MODEL: &str = "\
1 0.0 0.0 0.0
2 1.0 0.0 0.0
3 0.0 1.0 0.0
4 0.0 0.0 1.0
NH 1e4 1e5
T_ISO 3600.0 0.5
T_EXPAN_NONE
Density 1.0
T4
1 1 2 3 4
<FixP> all 1 2 3
<Disp> x 1.0 4
</BC>
DampingCoef 0.0
InitialTemp 37.0
TimeStep 0.1
TotalTime 20.0
";

#[test]
fn test_oversized_time_step_is_reported_as_divergence() {
    let model = common::load_from_text("stiff", STIFF_MODEL);
    let result = run_simulation(&model);

    assert!(matches!(result, Err(SimulationError::Diverged { .. })));
}

#[test]
fn test_stable_time_step_completes() {
    // Same model with Δt well below the stability limit and a modest pull
    let text = STIFF_MODEL
        .replace("<Disp> x 1.0 4", "<Disp> x 0.05 4")
        .replace("TimeStep 0.1", "TimeStep 1e-4")
        .replace("TotalTime 20.0", "TotalTime 0.05");
    let model = common::load_from_text("stiff_stable", &text);

    assert!(run_simulation(&model).is_ok());
}
