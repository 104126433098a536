pub mod config;
pub mod error;
pub mod mo;

pub use config::{Bounds, OptimizerConfig};
pub use error::Error;
pub use mo::optimizers::nsga3::NSGA3Optimizer;
pub use mo::optimizers::Optimizer;
pub use mo::{GenerationObserver, Objective, Objectives};
