pub mod assembly;
pub mod element;
pub mod state;
pub mod time_integration;

pub use assembly::Assembler;
pub use element::{reference_gradients, Tet4};
pub use state::{ElementScratch, SolverState};
pub use time_integration::{advance_step, run_simulation};
