use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::config::OptimizerConfig;
use crate::error::Error;

const MIN_SPREAD: f64 = 1e-10;
const IDENTICAL_GENE: f64 = 1e-14;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind
{
    #[default]
    Polynomial,
    Gaussian
}

#[derive(Debug, Clone)]
enum Mutation
{
    Polynomial { distribution_index: f64 },
    Gaussian { rate: f64, normal: Normal<f64> }
}

/// Crossover and mutation parameters of one optimizer.
#[derive(Debug, Clone)]
pub struct Variation
{
    crossover_probability: f64,
    eta: f64,
    epsilon: f64,
    mutation: Mutation
}

impl Variation
{
    pub fn from_config(config: &OptimizerConfig) -> Result<Self, Error>
    {
        let mutation = match config.mutation {
            MutationKind::Polynomial => Mutation::Polynomial {
                distribution_index: config.distribution_index
            },
            MutationKind::Gaussian => Mutation::Gaussian {
                rate: config.mutation_probability,
                normal: Normal::new(0.0, config.mutation_strength)
                    .map_err(|_| Error::invalid_parameter("mutation_strength", config.mutation_strength))?
            }
        };

        Ok(Variation {
            crossover_probability: config.crossover_probability,
            eta: config.eta,
            epsilon: config.epsilon,
            mutation
        })
    }

    pub fn crossover_probability(&self) -> f64
    {
        self.crossover_probability
    }

    pub fn mutate<R: Rng + ?Sized>(&self, rng: &mut R, candidate: &[f64], lower: &[f64], upper: &[f64]) -> Vec<f64>
    {
        match &self.mutation {
            Mutation::Polynomial { distribution_index } => {
                let rate = 1.0 / candidate.len().max(1) as f64;

                polynomial_mutation(rng, candidate, rate, lower, upper, *distribution_index)
            }
            Mutation::Gaussian { rate, normal } => gaussian_mutation(rng, candidate, *rate, normal, lower, upper)
        }
    }

    pub fn crossover<R: Rng + ?Sized>(&self, rng: &mut R, parent_a: &[f64], parent_b: &[f64], lower: &[f64], upper: &[f64]) -> (Vec<f64>, Vec<f64>)
    {
        crossover(rng, parent_a, parent_b, lower, upper, self.eta, self.epsilon)
    }
}

/// Elementwise `min(max(candidate, lower), upper)`.
pub fn clamp(candidate: &[f64], lower: &[f64], upper: &[f64]) -> Vec<f64>
{
    candidate.iter()
        .zip(lower.iter().zip(upper))
        .map(|(&value, (&lower, &upper))| value.max(lower).min(upper))
        .collect()
}

fn spread_factor(u: f64, beta: f64, eta: f64) -> f64
{
    let alpha = 2.0 - beta.powf(-(eta + 1.0));
    let exponent = 1.0 / (eta + 1.0);

    if u <= 1.0 / alpha
    {
        (u * alpha).powf(exponent)
    }
    else
    {
        (1.0 / (2.0 - u * alpha)).powf(exponent)
    }
}

/// Simulated binary crossover of two parents with bound-aware spread.
///
/// Parents that differ by less than `epsilon` on every variable are returned
/// as they are. Otherwise each variable is crossed with probability one half,
/// and a fair coin decides which child takes the lower offspring value.
pub fn crossover<R: Rng + ?Sized>(rng: &mut R,
                                  parent_a: &[f64],
                                  parent_b: &[f64],
                                  lower: &[f64],
                                  upper: &[f64],
                                  eta: f64,
                                  epsilon: f64) -> (Vec<f64>, Vec<f64>)
{
    if parent_a.iter().zip(parent_b).all(|(a, b)| (a - b).abs() < epsilon)
    {
        return (parent_a.to_vec(), parent_b.to_vec());
    }

    let mut child_a = parent_a.to_vec();
    let mut child_b = parent_b.to_vec();

    for i in 0..parent_a.len()
    {
        let (a, b) = (parent_a[i], parent_b[i]);

        if !rng.gen_bool(0.5) || (a - b).abs() < IDENTICAL_GENE
        {
            continue;
        }

        let current_min = a.min(b);
        let current_max = a.max(b);
        let current_diff = (current_max - current_min).max(MIN_SPREAD);

        let u: f64 = rng.gen();

        let beta1 = 1.0 + 2.0 * (current_min - lower[i]) / current_diff;
        let beta2 = 1.0 + 2.0 * (upper[i] - current_max) / current_diff;

        let betaq1 = spread_factor(u, beta1, eta);
        let betaq2 = spread_factor(u, beta2, eta);

        let c1 = (0.5 * ((current_min + current_max) - betaq1 * current_diff)).max(lower[i]).min(upper[i]);
        let c2 = (0.5 * ((current_min + current_max) + betaq2 * current_diff)).max(lower[i]).min(upper[i]);

        if rng.gen_bool(0.5)
        {
            child_a[i] = c2;
            child_b[i] = c1;
        }
        else
        {
            child_a[i] = c1;
            child_b[i] = c2;
        }
    }

    (clamp(&child_a, lower, upper), clamp(&child_b, lower, upper))
}

/// Bounded polynomial mutation, each variable mutated with probability `rate`.
pub fn polynomial_mutation<R: Rng + ?Sized>(rng: &mut R,
                                            candidate: &[f64],
                                            rate: f64,
                                            lower: &[f64],
                                            upper: &[f64],
                                            distribution_index: f64) -> Vec<f64>
{
    let mut mutated = candidate.to_vec();
    let mutation_power = 1.0 / (distribution_index + 1.0);

    for gene_index in 0..mutated.len()
    {
        // Should this gene be mutated?
        if rng.gen::<f64>() >= rate
        {
            continue;
        }

        let gene_range = upper[gene_index] - lower[gene_index];
        if gene_range <= 0.0
        {
            continue;
        }

        // Normalised distance from the bounds.
        let lower_delta = (mutated[gene_index] - lower[gene_index]) / gene_range;
        let upper_delta = (upper[gene_index] - mutated[gene_index]) / gene_range;

        let rand: f64 = rng.gen();
        let perturbation_factor =
            if rand < 0.5 {
                let value = 2.0 * rand + (1.0 - 2.0 * rand) * upper_delta.powf(distribution_index + 1.0);

                value.powf(mutation_power) - 1.0
            } else {
                let value = 2.0 * (1.0 - rand) + 2.0 * (rand - 0.5) * lower_delta.powf(distribution_index + 1.0);

                1.0 - value.powf(mutation_power)
            };

        mutated[gene_index] += perturbation_factor * gene_range;
    }

    clamp(&mutated, lower, upper)
}

/// Additive gaussian noise on each variable with probability `rate`.
pub fn gaussian_mutation<R: Rng + ?Sized>(rng: &mut R,
                                          candidate: &[f64],
                                          rate: f64,
                                          normal: &Normal<f64>,
                                          lower: &[f64],
                                          upper: &[f64]) -> Vec<f64>
{
    let mut mutated = candidate.to_vec();

    for gene in mutated.iter_mut()
    {
        if rng.gen::<f64>() < rate
        {
            *gene += normal.sample(rng);
        }
    }

    clamp(&mutated, lower, upper)
}

/// Breed `population.len()` children from random distinct parent pairs.
pub fn reproduce<R: Rng + ?Sized>(rng: &mut R,
                                  population: &[Vec<f64>],
                                  variation: &Variation,
                                  lower: &[f64],
                                  upper: &[f64]) -> Vec<Vec<f64>>
{
    let population_len = population.len();
    let mut children = Vec::with_capacity(population_len + 1);

    if population_len == 0
    {
        return children;
    }

    while children.len() < population_len
    {
        let index_a = rng.gen_range(0..population_len);
        let mut index_b = rng.gen_range(0..population_len);

        // Make sure that the parents differ.
        if index_a == index_b && population_len > 1
        {
            if index_b < population_len - 1
            {
                index_b += 1;
            }
            else
            {
                index_b -= 1;
            }
        }

        let parent_a = &population[index_a];
        let parent_b = &population[index_b];

        let (child_a, child_b) =
            if rng.gen_bool(variation.crossover_probability()) {
                variation.crossover(rng, parent_a, parent_b, lower, upper)
            } else {
                (parent_a.clone(), parent_b.clone())
            };

        children.push(variation.mutate(rng, &child_a, lower, upper));
        children.push(variation.mutate(rng, &child_b, lower, upper));
    }

    children
}
