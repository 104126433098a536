use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::mo::survival::SurvivalStrategy;
use crate::mo::variation::MutationKind;
use crate::mo::SortingAlgorithm;

/// Box bound for the decision variables, either one value shared by every
/// variable or one value per variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bounds
{
    Uniform(f64),
    PerVariable(Vec<f64>)
}

impl Bounds
{
    /// Expand the bound to `variables_len` entries.
    pub fn broadcast(&self, name: &'static str, variables_len: usize) -> Result<Vec<f64>, Error>
    {
        match self {
            Bounds::Uniform(value) => Ok(vec![*value; variables_len]),
            Bounds::PerVariable(values) if values.len() == 1 => Ok(vec![values[0]; variables_len]),
            Bounds::PerVariable(values) => {
                if values.len() != variables_len
                {
                    return Err(Error::BoundsDimensionMismatch {
                        bound: name,
                        got: values.len(),
                        expected: variables_len
                    });
                }

                Ok(values.clone())
            }
        }
    }
}

impl From<f64> for Bounds
{
    fn from(value: f64) -> Self {
        Bounds::Uniform(value)
    }
}

impl From<Vec<f64>> for Bounds
{
    fn from(values: Vec<f64>) -> Self {
        Bounds::PerVariable(values)
    }
}

/// Construction-time parameters of the optimizer.
///
/// Every field has a default, so a JSON document only needs the keys it
/// wants to override:
/// ```
/// use nsga3_solver::config::OptimizerConfig;
///
/// let config = OptimizerConfig::from_json(r#"{ "population_size": 40, "seed": 7 }"#).unwrap();
/// assert_eq!(config.population_size, 40);
/// assert_eq!(config.max_generations, 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig
{
    pub population_size: usize,
    pub max_generations: usize,
    pub crossover_probability: f64,
    /// Per-variable rate of the gaussian mutation. Polynomial mutation
    /// always uses `1 / n_variables`.
    pub mutation_probability: f64,
    /// Standard deviation of the gaussian mutation.
    pub mutation_strength: f64,
    /// Parents closer than this on every variable are not crossed over.
    pub epsilon: f64,
    /// Distribution index of the simulated binary crossover.
    pub eta: f64,
    /// Distribution index of the polynomial mutation.
    pub distribution_index: f64,
    pub lower_bound: Bounds,
    pub upper_bound: Bounds,
    pub reference_directions: Option<Vec<Vec<f64>>>,
    pub reference_partitions: Option<usize>,
    pub survival: SurvivalStrategy,
    pub sorting: SortingAlgorithm,
    pub mutation: MutationKind,
    pub seed: Option<u64>,
    /// `1` evaluates sequentially, `0` picks a worker count from the cpu
    /// count, anything else is the number of evaluation threads.
    pub evaluation_workers: usize
}

impl Default for OptimizerConfig
{
    fn default() -> Self {
        OptimizerConfig {
            population_size: 100,
            max_generations: 2000,
            crossover_probability: 0.6,
            mutation_probability: 0.3,
            mutation_strength: 1e-3,
            epsilon: 1e-6,
            eta: 20.0,
            distribution_index: 20.0,
            lower_bound: Bounds::Uniform(0.0),
            upper_bound: Bounds::Uniform(1.0),
            reference_directions: None,
            reference_partitions: None,
            survival: SurvivalStrategy::default(),
            sorting: SortingAlgorithm::default(),
            mutation: MutationKind::default(),
            seed: None,
            evaluation_workers: 1
        }
    }
}

impl OptimizerConfig
{
    pub fn from_json(json: &str) -> Result<Self, Error>
    {
        let config: OptimizerConfig = serde_json::from_str(json)?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error>
    {
        // Make sure for evolution to work at least four candidates are present.
        if self.population_size < 4 || self.population_size % 4 != 0
        {
            return Err(Error::InvalidPopulationSize(self.population_size));
        }

        for (name, value) in [
            ("crossover_probability", self.crossover_probability),
            ("mutation_probability", self.mutation_probability)
        ]
        {
            if !(0.0..=1.0).contains(&value)
            {
                return Err(Error::invalid_probability(name, value));
            }
        }

        for (name, value) in [
            ("mutation_strength", self.mutation_strength),
            ("epsilon", self.epsilon),
            ("eta", self.eta),
            ("distribution_index", self.distribution_index)
        ]
        {
            if !value.is_finite() || value <= 0.0
            {
                return Err(Error::invalid_parameter(name, value));
            }
        }

        if self.reference_partitions == Some(0)
        {
            return Err(Error::invalid_parameter("reference_partitions", 0.0));
        }

        Ok(())
    }

    /// Resolve both bounds against the dimensionality of the starting point.
    pub(crate) fn resolve_bounds(&self, variables_len: usize) -> Result<(Vec<f64>, Vec<f64>), Error>
    {
        let lower = self.lower_bound.broadcast("lower_bound", variables_len)?;
        let upper = self.upper_bound.broadcast("upper_bound", variables_len)?;

        for (index, (&lower, &upper)) in lower.iter().zip(&upper).enumerate()
        {
            if !lower.is_finite()
            {
                return Err(Error::NonFiniteBound { name: "lower_bound", index, value: lower });
            }

            if !upper.is_finite()
            {
                return Err(Error::NonFiniteBound { name: "upper_bound", index, value: upper });
            }

            if lower > upper
            {
                return Err(Error::InvalidBounds { index, lower, upper });
            }
        }

        Ok((lower, upper))
    }
}
