use crate::error::Error;
use crate::mo::{GenerationObserver, Objective};

pub trait Optimizer
{
    fn name(&self) -> &str;

    /// Run the optimization from `iterate`, which is overwritten with a member
    /// of the final Pareto set. Returns the smallest objective sum of the final
    /// population.
    fn optimize(&mut self,
                objectives: &[Box<dyn Objective>],
                iterate: &mut [f64],
                observers: &mut [&mut dyn GenerationObserver]) -> Result<f64, Error>;

    /// `(objectives, variables)` of every member of the last Pareto front.
    fn best_solutions(&self) -> Vec<(Vec<f64>, Vec<f64>)>;
}
