use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::mo::GenerationObserver;

fn best_sum(objectives: &[Vec<f64>], fronts: &[Vec<usize>]) -> f64
{
    fronts.first()
        .map(|front| {
            front.iter()
                .map(|&index| objectives[index].iter().sum::<f64>())
                .fold(f64::INFINITY, f64::min)
        })
        .unwrap_or(f64::INFINITY)
}

/// Stops a run once the best objective sum in the first front has not
/// improved for `patience` consecutive generations.
#[derive(Debug, Clone)]
pub struct EarlyStop
{
    patience: usize,
    best: f64,
    stale_generations: usize
}

impl EarlyStop
{
    pub fn new(patience: usize) -> Self
    {
        EarlyStop {
            patience,
            best: f64::INFINITY,
            stale_generations: 0
        }
    }

    pub fn stale_generations(&self) -> usize
    {
        self.stale_generations
    }
}

impl GenerationObserver for EarlyStop
{
    fn on_begin(&mut self, _iterate: &[f64]) -> bool {
        self.best = f64::INFINITY;
        self.stale_generations = 0;

        false
    }

    fn on_generation_end(&mut self, _generation: usize, objectives: &[Vec<f64>], fronts: &[Vec<usize>]) -> bool {
        let best = best_sum(objectives, fronts);

        if best < self.best
        {
            self.best = best;
            self.stale_generations = 0;
        }
        else
        {
            self.stale_generations += 1;
        }

        self.stale_generations >= self.patience
    }
}

/// Cooperative cancellation through a flag shared with other threads.
#[derive(Debug, Clone, Default)]
pub struct StopFlag
{
    flag: Arc<AtomicBool>
}

impl StopFlag
{
    pub fn new(flag: Arc<AtomicBool>) -> Self
    {
        StopFlag {
            flag
        }
    }

    pub fn handle(&self) -> Arc<AtomicBool>
    {
        self.flag.clone()
    }

    pub fn stop(&self)
    {
        self.flag.store(true, Ordering::Relaxed);
    }
}

impl GenerationObserver for StopFlag
{
    fn on_begin(&mut self, _iterate: &[f64]) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    fn on_generation_end(&mut self, _generation: usize, _objectives: &[Vec<f64>], _fronts: &[Vec<usize>]) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Logs progress every `every` generations.
#[derive(Debug, Clone)]
pub struct ProgressLogger
{
    every: usize
}

impl ProgressLogger
{
    pub fn new(every: usize) -> Self
    {
        ProgressLogger {
            every: every.max(1)
        }
    }
}

impl Default for ProgressLogger
{
    fn default() -> Self {
        ProgressLogger::new(1)
    }
}

impl GenerationObserver for ProgressLogger
{
    fn on_generation_end(&mut self, generation: usize, objectives: &[Vec<f64>], fronts: &[Vec<usize>]) -> bool {
        if generation % self.every == 0
        {
            info!(generation,
                  fronts = fronts.len(),
                  first_front = fronts.first().map_or(0, |front| front.len()),
                  best_sum = best_sum(objectives, fronts),
                  "generation finished");
        }

        false
    }

    fn on_end(&mut self, _iterate: &[f64], pareto_front: &[Vec<f64>]) {
        let best_sum = pareto_front.iter()
            .map(|objectives| objectives.iter().sum::<f64>())
            .fold(f64::INFINITY, f64::min);

        info!(pareto_front = pareto_front.len(), best_sum, "final Pareto front");
    }
}

/// Keeps the first-front objective vectors of every generation.
#[derive(Debug, Clone, Default)]
pub struct FrontHistory
{
    generations: Vec<Vec<Vec<f64>>>,
    final_front: Vec<Vec<f64>>
}

impl FrontHistory
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn generations(&self) -> &[Vec<Vec<f64>>]
    {
        &self.generations
    }

    pub fn final_front(&self) -> &[Vec<f64>]
    {
        &self.final_front
    }
}

impl GenerationObserver for FrontHistory
{
    fn on_begin(&mut self, _iterate: &[f64]) -> bool {
        self.generations.clear();
        self.final_front.clear();

        false
    }

    fn on_generation_end(&mut self, _generation: usize, objectives: &[Vec<f64>], fronts: &[Vec<usize>]) -> bool {
        let front: Vec<Vec<f64>> = fronts.first()
            .map(|front| front.iter().map(|&index| objectives[index].clone()).collect())
            .unwrap_or_default();

        self.generations.push(front);

        false
    }

    fn on_end(&mut self, _iterate: &[f64], pareto_front: &[Vec<f64>]) {
        self.final_front = pareto_front.to_vec();
    }
}
