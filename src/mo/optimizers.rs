pub mod nsga3;

pub use crate::mo::optimizer::Optimizer;
