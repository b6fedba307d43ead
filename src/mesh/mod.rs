pub mod geometry;
pub mod topology;

pub use geometry::{Geometry, Mesh};
pub use topology::{Connectivity, NodeElementMap, Tet4Element};
