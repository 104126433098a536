pub mod ens_nondominating_sorting;
pub mod evaluator;
pub mod fast_nondominated_sorting;
pub mod indicators;
pub mod normalization;
pub mod observers;
pub mod optimizer;
pub mod optimizers;
#[cfg(feature = "plot")]
pub mod plot;
pub mod problem;
pub mod problems;
pub mod reference_directions;
pub mod survival;
pub mod variation;
#[cfg(test)]
mod tests;

use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};

/// A single objective of the optimization.
///
/// The optimizer always finds a minimum, so if your case requires finding the
/// maximum instead, simply multiply the value by -1 before returning.
/// Implementations must be pure: the same candidate always yields the same value.
pub trait Objective: DynClone + Send + Sync {
    fn evaluate(&self, candidate: &[f64]) -> f64;
}

dyn_clone::clone_trait_object!(Objective);

impl<F> Objective for F
    where
        F: Fn(&[f64]) -> f64 + Clone + Send + Sync
{
    fn evaluate(&self, candidate: &[f64]) -> f64 {
        self(candidate)
    }
}

pub type Objectives = Vec<Box<dyn Objective>>;

/// Hooks invoked by an optimizer around a run.
///
/// A `true` return from [`GenerationObserver::on_begin`] or
/// [`GenerationObserver::on_generation_end`] asks the optimizer to stop; the
/// current generation is always finished first.
pub trait GenerationObserver {
    fn on_begin(&mut self, _iterate: &[f64]) -> bool {
        false
    }

    fn on_generation_end(&mut self,
                         _generation: usize,
                         _objectives: &[Vec<f64>],
                         _fronts: &[Vec<usize>]) -> bool {
        false
    }

    fn on_end(&mut self, _iterate: &[f64], _pareto_front: &[Vec<f64>]) {}
}

/// Algorithm used to partition a population into Pareto fronts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortingAlgorithm {
    #[default]
    Fast,
    EfficientNonDominated
}

impl SortingAlgorithm {
    /// Returns the fronts (best first) and the rank of every candidate.
    pub fn sort(&self, objectives: &[Vec<f64>]) -> (Vec<Vec<usize>>, Vec<usize>) {
        match self {
            SortingAlgorithm::Fast => fast_nondominated_sorting::fast_nondominated_sort(objectives),
            SortingAlgorithm::EfficientNonDominated => ens_nondominating_sorting::ens_nondominated_sort(objectives)
        }
    }
}
