pub mod bc;
pub mod error;
pub mod fem;
pub mod io;
pub mod linalg;
pub mod mechanics;
pub mod mesh;
pub mod model;
pub mod physics;

pub use bc::{Axis, BcTables};
pub use error::SimulationError;
pub use fem::{advance_step, run_simulation, Assembler, ElementScratch, SolverState, Tet4};
pub use io::{load_model, VtkWriter};
pub use mechanics::{Hyperelastic, ThermalExpansion};
pub use mesh::{Connectivity, Geometry, Mesh, NodeElementMap, Tet4Element};
pub use model::Model;
pub use physics::{Conductivity, ThermalMaterial};
