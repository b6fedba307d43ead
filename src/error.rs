//! Fatal error conditions for the simulation pipeline
//!
//! Every variant aborts the run: loading errors before the simulation loop,
//! divergence between steps, export errors during output.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    /// No model file argument was given on the command line.
    #[error("missing input argument (e.g., Liver_Iso.txt)")]
    MissingInput,

    /// The model file could not be opened or read.
    #[error("cannot open file {path}: {source}")]
    InputOpen {
        path: String,
        source: std::io::Error,
    },

    /// The model file does not follow the expected text format.
    #[error("malformed model file: {0}")]
    Parse(String),

    /// An element has a non-positive or non-finite reference Jacobian.
    #[error("degenerate element {id}: non-positive reference volume")]
    DegenerateElement { id: usize },

    /// A nodal displacement or temperature became non-finite.
    #[error("solution diverged at step {step}, simulation aborted. Try a smaller time step")]
    Diverged { step: usize },

    /// An output file could not be created or written.
    #[error("cannot open {path} for writing, results not saved: {source}")]
    OutputOpen {
        path: String,
        source: std::io::Error,
    },
}
