use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument};

use crate::config::OptimizerConfig;
use crate::error::Error;
use crate::mo::evaluator::{evaluator_for_workers, PopulationEvaluator};
use crate::mo::optimizer::Optimizer;
use crate::mo::survival::{Survival, SurvivalStrategy};
use crate::mo::variation::{clamp, reproduce, Variation};
use crate::mo::{GenerationObserver, Objective};

/// Generational multi-objective optimizer with NSGA-III style truncation.
///
/// Every generation breeds as many children as there are parents, sorts the
/// combined population into Pareto fronts and keeps the best half by rank and
/// survival score.
pub struct NSGA3Optimizer<R: Rng = StdRng>
{
    config: OptimizerConfig,
    variation: Variation,
    evaluator: Box<dyn PopulationEvaluator>,
    rng: R,
    pareto_set: Array2<f64>,
    pareto_front: Array2<f64>
}

impl NSGA3Optimizer<StdRng>
{
    /// Seeded from `config.seed`, or from system entropy when there is none.
    pub fn new(config: OptimizerConfig) -> Result<Self, Error>
    {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy()
        };

        Self::with_rng(config, rng)
    }
}

impl<R: Rng> NSGA3Optimizer<R>
{
    pub fn with_rng(config: OptimizerConfig, rng: R) -> Result<Self, Error>
    {
        config.validate()?;

        let variation = Variation::from_config(&config)?;
        let evaluator = evaluator_for_workers(config.evaluation_workers);

        Ok(NSGA3Optimizer {
            config,
            variation,
            evaluator,
            rng,
            pareto_set: Array2::zeros((0, 0)),
            pareto_front: Array2::zeros((0, 0))
        })
    }

    pub fn with_evaluator(mut self, evaluator: Box<dyn PopulationEvaluator>) -> Self
    {
        self.evaluator = evaluator;
        self
    }

    pub fn config(&self) -> &OptimizerConfig
    {
        &self.config
    }

    /// Decision variables of the last Pareto set, one row per member.
    pub fn pareto_set(&self) -> &Array2<f64>
    {
        &self.pareto_set
    }

    /// Objective values of the last Pareto set, one row per member.
    pub fn pareto_front(&self) -> &Array2<f64>
    {
        &self.pareto_front
    }

    fn initial_population(&mut self, iterate: &[f64], lower: &[f64], upper: &[f64]) -> Vec<Vec<f64>>
    {
        (0..self.config.population_size)
            .map(|_| {
                let candidate: Vec<f64> = iterate.iter()
                    .map(|value| value + self.rng.gen::<f64>() - 0.5)
                    .collect();

                clamp(&candidate, lower, upper)
            })
            .collect()
    }
}

/// Index of the front that fills the population, counting fronts in rank order.
fn boundary_front(fronts: &[Vec<usize>], population_size: usize) -> usize
{
    let mut selected = 0;

    for (index, front) in fronts.iter().enumerate()
    {
        selected += front.len();

        if selected >= population_size
        {
            return index;
        }
    }

    fronts.len().saturating_sub(1)
}

/// Population indices ordered by rank, then by descending survival score.
fn survival_order(ranks: &[usize], scores: &[f64]) -> Vec<usize>
{
    let mut order: Vec<usize> = (0..ranks.len()).collect();

    order.sort_by(|&a, &b| {
        ranks[a].cmp(&ranks[b])
            .then_with(|| scores[b].total_cmp(&scores[a]))
    });

    order
}

fn rows_to_array(rows: &[Vec<f64>], indices: &[usize]) -> Array2<f64>
{
    let width = indices.first().map_or(0, |&index| rows[index].len());

    Array2::from_shape_fn((indices.len(), width), |(row, column)| rows[indices[row]][column])
}

fn notify_begin(observers: &mut [&mut dyn GenerationObserver], iterate: &[f64]) -> bool
{
    observers.iter_mut()
        .fold(false, |terminate, observer| observer.on_begin(iterate) || terminate)
}

fn notify_generation_end(observers: &mut [&mut dyn GenerationObserver],
                         generation: usize,
                         objectives: &[Vec<f64>],
                         fronts: &[Vec<usize>]) -> bool
{
    observers.iter_mut()
        .fold(false, |terminate, observer| observer.on_generation_end(generation, objectives, fronts) || terminate)
}

impl<R: Rng> Optimizer for NSGA3Optimizer<R>
{
    fn name(&self) -> &str {
        match self.config.survival {
            SurvivalStrategy::Geometry => "AGE-MOEA-II",
            SurvivalStrategy::ReferenceDirections => "NSGA-III"
        }
    }

    #[instrument(level = "debug", skip_all, fields(
        optimizer = self.name(),
        population = self.config.population_size,
        generations = self.config.max_generations
    ))]
    fn optimize(&mut self,
                objectives: &[Box<dyn Objective>],
                iterate: &mut [f64],
                observers: &mut [&mut dyn GenerationObserver]) -> Result<f64, Error> {
        if objectives.is_empty()
        {
            return Err(Error::NoObjectives);
        }

        if iterate.is_empty()
        {
            return Err(Error::EmptyIterate);
        }

        let (lower, upper) = self.config.resolve_bounds(iterate.len())?;
        let survival = Survival::from_config(&self.config, objectives.len())?;
        let population_size = self.config.population_size;

        let mut population = self.initial_population(iterate, &lower, &upper);

        info!(objectives = objectives.len(), variables = iterate.len(), "NSGA3 initialized successfully. Optimization started.");

        let mut terminate = notify_begin(observers, iterate);

        for generation in 1..=self.config.max_generations
        {
            if terminate
            {
                debug!(generation, "terminated by observer");
                break;
            }

            let children = reproduce(&mut self.rng, &population, &self.variation, &lower, &upper);
            population.extend(children);

            let values = self.evaluator.evaluate(objectives, &population);
            let (fronts, ranks) = self.config.sorting.sort(&values);

            let boundary = boundary_front(&fronts, population_size);
            let scores = survival.scores(&mut self.rng, &values, &fronts, boundary);

            debug!(generation,
                   fronts = fronts.len(),
                   first_front = fronts.first().map_or(0, |front| front.len()),
                   boundary_front = boundary,
                   "generation sorted");

            let mut order = survival_order(&ranks, &scores);
            order.truncate(population_size);

            let mut combined = population;
            population = order.into_iter()
                .map(|index| std::mem::take(&mut combined[index]))
                .collect();

            terminate = notify_generation_end(observers, generation, &values, &fronts);
        }

        let values = self.evaluator.evaluate(objectives, &population);
        let (fronts, _) = self.config.sorting.sort(&values);
        let first_front = fronts.into_iter().next().unwrap_or_default();

        self.pareto_set = rows_to_array(&population, &first_front);
        self.pareto_front = rows_to_array(&values, &first_front);

        if let Some(&best) = first_front.first()
        {
            iterate.copy_from_slice(&population[best]);
        }

        let pareto_front: Vec<Vec<f64>> = first_front.iter()
            .map(|&index| values[index].clone())
            .collect();

        for observer in observers.iter_mut()
        {
            observer.on_end(iterate, &pareto_front);
        }

        let performance = values.iter()
            .map(|objective| objective.iter().sum::<f64>())
            .fold(f64::INFINITY, f64::min);

        info!(pareto_front = pareto_front.len(), performance, "optimization finished");

        Ok(performance)
    }

    fn best_solutions(&self) -> Vec<(Vec<f64>, Vec<f64>)> {
        self.pareto_front.rows()
            .into_iter()
            .zip(self.pareto_set.rows())
            .map(|(objectives, variables)| (objectives.to_vec(), variables.to_vec()))
            .collect()
    }
}
