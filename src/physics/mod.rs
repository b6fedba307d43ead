pub mod conduction;

pub use conduction::{Conductivity, ThermalMaterial};
