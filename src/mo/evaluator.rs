use tracing::trace;

use crate::mo::Objective;

/// Applies every objective to every member of a population.
///
/// Row `i` of the result is the objective vector of `population[i]`.
pub trait PopulationEvaluator: Send + Sync
{
    fn evaluate(&self, objectives: &[Box<dyn Objective>], population: &[Vec<f64>]) -> Vec<Vec<f64>>;
}

fn evaluate_candidate(objectives: &[Box<dyn Objective>], candidate: &[f64]) -> Vec<f64>
{
    objectives.iter()
        .map(|objective| objective.evaluate(candidate))
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialEvaluator;

impl PopulationEvaluator for SequentialEvaluator
{
    fn evaluate(&self, objectives: &[Box<dyn Objective>], population: &[Vec<f64>]) -> Vec<Vec<f64>> {
        trace!(population = population.len(), "evaluating population");

        population.iter()
            .map(|candidate| evaluate_candidate(objectives, candidate))
            .collect()
    }
}

/// Evaluates contiguous chunks of the population on scoped worker threads.
#[derive(Debug, Clone, Copy)]
pub struct ParallelEvaluator
{
    workers: usize
}

impl ParallelEvaluator
{
    /// With no explicit count the workers are allocated based on cpu,
    /// leaving two cores to the caller on bigger machines.
    pub fn new(workers: Option<usize>) -> Self
    {
        let workers =
            match workers {
                None | Some(0) => {
                    let cpus = num_cpus::get();

                    if cpus <= 3
                    {
                        1
                    }
                    else
                    {
                        cpus - 2
                    }
                }
                Some(workers) => workers
            };

        ParallelEvaluator {
            workers
        }
    }

    pub fn workers(&self) -> usize
    {
        self.workers
    }
}

impl PopulationEvaluator for ParallelEvaluator
{
    fn evaluate(&self, objectives: &[Box<dyn Objective>], population: &[Vec<f64>]) -> Vec<Vec<f64>> {
        if self.workers <= 1 || population.len() < 2
        {
            return SequentialEvaluator.evaluate(objectives, population);
        }

        trace!(population = population.len(), workers = self.workers, "evaluating population");

        let chunk_size = (population.len() + self.workers - 1) / self.workers;
        let mut results = vec![vec![]; population.len()];

        let scope_result = crossbeam::thread::scope(|scope| {
            for (candidates, out) in population.chunks(chunk_size).zip(results.chunks_mut(chunk_size))
            {
                scope.spawn(move |_| {
                    for (candidate, values) in candidates.iter().zip(out.iter_mut())
                    {
                        *values = evaluate_candidate(objectives, candidate);
                    }
                });
            }
        });

        // Re-raise a panicking objective on the calling thread.
        if let Err(panic) = scope_result
        {
            std::panic::resume_unwind(panic);
        }

        results
    }
}

/// Pick the evaluator matching a configured worker count.
pub fn evaluator_for_workers(workers: usize) -> Box<dyn PopulationEvaluator>
{
    match workers {
        1 => Box::new(SequentialEvaluator),
        0 => Box::new(ParallelEvaluator::new(None)),
        workers => Box::new(ParallelEvaluator::new(Some(workers)))
    }
}
