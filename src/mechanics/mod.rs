pub mod expansion;
pub mod hyperelastic;

pub use expansion::ThermalExpansion;
pub use hyperelastic::Hyperelastic;
