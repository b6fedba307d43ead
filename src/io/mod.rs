pub mod loader;
pub mod vtk;

pub use loader::load_model;
pub use vtk::VtkWriter;
