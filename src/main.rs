use std::path::Path;
use std::process::ExitCode;

use tissue_simulator::{load_model, run_simulation, SimulationError, VtkWriter};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("\n\tError: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), SimulationError> {
    let path = std::env::args()
        .nth(1)
        .ok_or(SimulationError::MissingInput)?;

    let model = load_model(&path)?;
    model.print_summary();

    let state = run_simulation(&model)?;

    VtkWriter::export_results(&model, &state, Path::new("."))
}
