use dyn_clone::DynClone;

use crate::mo::Objectives;

/// A benchmark problem with a known Pareto-optimal set.
pub trait Problem: DynClone {
    fn name(&self) -> &str;
    fn variables_len(&self) -> usize;
    fn objectives(&self) -> Objectives;
    fn lower_bound(&self) -> f64;
    fn upper_bound(&self) -> f64;
    /// Distance of a candidate from the Pareto-optimal set; 0 means converged.
    fn convergence_metric(&self, x: &[f64]) -> f64;
}

dyn_clone::clone_trait_object!(Problem);
