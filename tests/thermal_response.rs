//! Thermal scenarios on a fully clamped tetrahedron: uniform volumetric
//! heating matches the closed-form lumped-mass rate, and adding a perfusion
//! sink keeps the temperature strictly between the reference value and the
//! un-perfused result.

mod common;

use approx::assert_relative_eq;
use tissue_simulator::run_simulation;

const HEATED_MODEL: &str = "\
1 0.0 0.0 0.0
2 1.0 0.0 0.0
3 0.0 1.0 0.0
4 0.0 0.0 1.0
NH 1.0 10.0
T_ISO 3600.0 0.5
T_EXPAN_NONE
Density 1000.0
T4
1 1 2 3 4
<FixP> all 1 2 3 4
<Metabo> 1e6
</BC>
DampingCoef 10.0
InitialTemp 37.0
TimeStep 1e-3
TotalTime 1.0
";

#[test]
fn test_uniform_heating_matches_closed_form() {
    let model = common::load_from_text("heating", HEATED_MODEL);
    let state = run_simulation(&model).unwrap();

    // Per step each node gains Δt·q·(V₀/4)/(m·c) with m = ρ·V₀/4, so the
    // field stays uniform and rises by Δt·q/(ρ·c) per step
    let rise_per_step = 1e-3 * 1e6 / (1000.0 * 3600.0);
    let expected = rise_per_step * model.num_steps as f64;

    for node in 0..4 {
        assert_relative_eq!(state.curr_t[node] - 37.0, expected, max_relative = 1e-6);
    }
}

#[test]
fn test_heating_is_monotonic() {
    let short = HEATED_MODEL.replace("TotalTime 1.0", "TotalTime 0.5");
    let model_short = common::load_from_text("heating_short", &short);
    let model_full = common::load_from_text("heating_full", HEATED_MODEL);

    let t_short = run_simulation(&model_short).unwrap().curr_t[0];
    let t_full = run_simulation(&model_full).unwrap().curr_t[0];

    assert!(t_short > 37.0);
    assert!(t_full > t_short);
}

#[test]
fn test_perfusion_bounds_the_temperature_rise() {
    let perfused = HEATED_MODEL.replace(
        "<Metabo> 1e6\n",
        "<Metabo> 1e6\n<Perfu> 1000.0 4000.0 37.0 1\n",
    );
    let model_perfused = common::load_from_text("perfused", &perfused);
    let model_plain = common::load_from_text("unperfused", HEATED_MODEL);

    let t_perfused = run_simulation(&model_perfused).unwrap().curr_t[0];
    let t_plain = run_simulation(&model_plain).unwrap().curr_t[0];

    // The sink removes heat in proportion to T − T_ref, so the perfused run
    // stays strictly above the reference and strictly below the plain run
    assert!(t_perfused > 37.0);
    assert!(t_perfused < t_plain - 1e-6);
}
