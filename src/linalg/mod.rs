pub mod small;

pub use small::{det3, invert3, try_invert3, DegenerateMatrix};
