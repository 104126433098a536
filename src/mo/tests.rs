use itertools::Itertools;

use crate::config::{Bounds, OptimizerConfig};
use crate::error::Error;
use crate::mo::observers::{EarlyStop, FrontHistory, StopFlag};
use crate::mo::optimizers::nsga3::NSGA3Optimizer;
use crate::mo::optimizers::Optimizer;
use crate::mo::problem::Problem;
use crate::mo::problems::{Dtlz1, SchafferN1, Zdt1};
use crate::mo::survival::SurvivalStrategy;
use crate::mo::{GenerationObserver, Objective, Objectives, SortingAlgorithm};

fn new_optimizer_config(problem: &dyn Problem, population_size: usize, max_generations: usize) -> OptimizerConfig
{
    OptimizerConfig {
        population_size,
        max_generations,
        lower_bound: Bounds::Uniform(problem.lower_bound()),
        upper_bound: Bounds::Uniform(problem.upper_bound()),
        seed: Some(42),
        ..Default::default()
    }
}

fn starting_point(problem: &dyn Problem) -> Vec<f64>
{
    vec![(problem.lower_bound() + problem.upper_bound()) / 2.0; problem.variables_len()]
}

fn optimize_and_get_best_solutions(optimizer: &mut Box<dyn Optimizer>, problem: &dyn Problem) -> Vec<(Vec<f64>, Vec<f64>)>
{
    let mut iterate = starting_point(problem);

    optimizer.optimize(&problem.objectives(), &mut iterate, &mut [])
        .unwrap();

    optimizer.best_solutions()
}

fn mean_convergence_metric_for_solutions(problem: &dyn Problem, solutions: &[(Vec<f64>, Vec<f64>)]) -> f64
{
    let sum = solutions
        .iter()
        .map(|solution| problem.convergence_metric(&solution.1))
        .sum::<f64>();

    sum / solutions.len() as f64
}

type OptimizerCreator = Box<dyn Fn(OptimizerConfig) -> Box<dyn Optimizer>>;

struct ProblemsSolver
{
    test_problems: Vec<Box<dyn Problem>>,
    optimizer_creators: Vec<OptimizerCreator>
}

impl ProblemsSolver
{
    pub fn new(test_problems: Vec<Box<dyn Problem>>, optimizer_creators: Vec<OptimizerCreator>) -> Self
    {
        ProblemsSolver {
            test_problems,
            optimizer_creators
        }
    }

    fn iter_optimizer_problem_best_solution(&self, population_size: usize, max_generations: usize)
        -> impl Iterator<Item = (Box<dyn Optimizer>, &Box<dyn Problem>, Vec<(Vec<f64>, Vec<f64>)>)>
    {
        self.optimizer_creators
            .iter()
            .cartesian_product(&self.test_problems)
            .map(move |(creator, problem)| {
                let config = new_optimizer_config(&**problem, population_size, max_generations);

                let mut optimizer = creator(config);

                let best_solutions = optimize_and_get_best_solutions(&mut optimizer, &**problem);

                (optimizer, problem, best_solutions)
            })
    }

    /// `(optimizer, problem, mean convergence metric)` for every pairing.
    fn calc_metric(&self, population_size: usize, max_generations: usize) -> Vec<(String, String, f64)>
    {
        self.iter_optimizer_problem_best_solution(population_size, max_generations)
            .map(|(optimizer, problem, best_solutions)| {
                let metric = mean_convergence_metric_for_solutions(&**problem, &best_solutions);

                (optimizer.name().to_string(), problem.name().to_string(), metric)
            })
            .collect()
    }
}

fn optimizer_creators() -> Vec<OptimizerCreator>
{
    vec![
        Box::new(|config: OptimizerConfig| {
            Box::new(NSGA3Optimizer::new(config).unwrap()) as Box<dyn Optimizer>
        }) as OptimizerCreator,
        Box::new(|config: OptimizerConfig| {
            let config = OptimizerConfig {
                survival: SurvivalStrategy::ReferenceDirections,
                ..config
            };

            Box::new(NSGA3Optimizer::new(config).unwrap()) as Box<dyn Optimizer>
        })
    ]
}

#[derive(Default)]
struct GenerationCounter
{
    begins: usize,
    generations: Vec<usize>,
    ends: usize
}

impl GenerationObserver for GenerationCounter
{
    fn on_begin(&mut self, _iterate: &[f64]) -> bool {
        self.begins += 1;
        false
    }

    fn on_generation_end(&mut self, generation: usize, _objectives: &[Vec<f64>], _fronts: &[Vec<usize>]) -> bool {
        self.generations.push(generation);
        false
    }

    fn on_end(&mut self, _iterate: &[f64], _pareto_front: &[Vec<f64>]) {
        self.ends += 1;
    }
}

#[test]
fn zdt1_front_approaches_curve_and_spreads() {
    let problem_solver = ProblemsSolver::new(vec![Box::new(Zdt1::new(5)) as Box<dyn Problem>], optimizer_creators());

    for (optimizer, _, best_solutions) in problem_solver.iter_optimizer_problem_best_solution(40, 100) {
        assert!(best_solutions.len() > 1, "{}", optimizer.name());

        let mse = best_solutions.iter()
            .map(|(objectives, _)| (objectives[1] - (1.0 - objectives[0].sqrt())).powi(2))
            .sum::<f64>() / best_solutions.len() as f64;

        assert!(mse < 0.01, "{}: mean squared deviation {}", optimizer.name(), mse);

        let (min_f1, max_f1) = best_solutions.iter()
            .map(|(objectives, _)| objectives[0])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), f1| (min.min(f1), max.max(f1)));

        assert!(min_f1 < 0.1 && max_f1 > 0.8, "{}: f1 spans {}..{}", optimizer.name(), min_f1, max_f1);
    }
}

#[test]
fn population_not_multiple_of_four_fails() {
    let config = OptimizerConfig {
        population_size: 10,
        ..Default::default()
    };

    assert!(matches!(NSGA3Optimizer::new(config), Err(Error::InvalidPopulationSize(10))));
}

#[test]
fn optimizers_converge_on_benchmarks() {
    let problem_solver = ProblemsSolver::new(
        vec![
            Box::new(Zdt1::new(5)) as Box<dyn Problem>,
            Box::new(SchafferN1::default())
        ],
        optimizer_creators()
    );

    let metrics = problem_solver.calc_metric(40, 100);
    assert_eq!(metrics.len(), 4);

    for (optimizer, problem, metric) in metrics {
        assert!(metric < 0.05, "{} - {}: {}", optimizer, problem, metric);
    }
}

#[test]
fn solutions_stay_within_bounds() {
    let problem_solver = ProblemsSolver::new(
        vec![Box::new(Dtlz1::new(7, 3)) as Box<dyn Problem>],
        optimizer_creators()
    );

    for (_, problem, best_solutions) in problem_solver.iter_optimizer_problem_best_solution(40, 30) {
        assert!(!best_solutions.is_empty());

        for (objectives, variables) in best_solutions {
            assert_eq!(objectives.len(), 3);
            assert_eq!(variables.len(), problem.variables_len());
            assert!(objectives.iter().all(|value| value.is_finite()));
            assert!(variables.iter().all(|&value| (problem.lower_bound()..=problem.upper_bound()).contains(&value)));
        }
    }
}

#[test]
fn same_seed_gives_same_result() {
    let problem = Zdt1::new(3);

    let run = || {
        let mut optimizer = NSGA3Optimizer::new(new_optimizer_config(&problem, 16, 20)).unwrap();
        let mut iterate = starting_point(&problem);
        let performance = optimizer.optimize(&problem.objectives(), &mut iterate, &mut []).unwrap();

        (performance, iterate, optimizer.pareto_set().clone())
    };

    assert_eq!(run(), run());
}

#[test]
fn parallel_evaluation_matches_sequential() {
    let problem = Zdt1::new(4);

    let run = |evaluation_workers: usize| {
        let config = OptimizerConfig {
            evaluation_workers,
            ..new_optimizer_config(&problem, 24, 15)
        };
        let mut optimizer = NSGA3Optimizer::new(config).unwrap();
        let mut iterate = starting_point(&problem);
        optimizer.optimize(&problem.objectives(), &mut iterate, &mut []).unwrap();

        optimizer.pareto_front().clone()
    };

    assert_eq!(run(1), run(4));
}

#[test]
fn iterate_and_return_value_come_from_final_front() {
    let problem = SchafferN1::default();
    let mut optimizer = NSGA3Optimizer::new(new_optimizer_config(&problem, 12, 10)).unwrap();
    let mut iterate = vec![5.0];

    let performance = optimizer.optimize(&problem.objectives(), &mut iterate, &mut []).unwrap();

    assert_eq!(iterate, optimizer.pareto_set().row(0).to_vec());

    let best_sum = optimizer.pareto_front()
        .rows()
        .into_iter()
        .map(|point| point.iter().sum::<f64>())
        .fold(f64::INFINITY, f64::min);

    assert_eq!(performance, best_sum);
}

#[test]
fn observers_see_every_generation() {
    let problem = Zdt1::new(2);
    let mut optimizer = NSGA3Optimizer::new(new_optimizer_config(&problem, 8, 7)).unwrap();
    let mut counter = GenerationCounter::default();
    let mut history = FrontHistory::new();
    let mut iterate = starting_point(&problem);

    optimizer.optimize(&problem.objectives(), &mut iterate, &mut [&mut counter, &mut history]).unwrap();

    assert_eq!(counter.begins, 1);
    assert_eq!(counter.generations, (1..=7).collect::<Vec<_>>());
    assert_eq!(counter.ends, 1);
    assert_eq!(history.generations().len(), 7);
    assert_eq!(history.final_front().len(), optimizer.pareto_front().nrows());
}

#[test]
fn early_stop_notifies_every_observer() {
    let problem = Zdt1::new(2);
    let mut optimizer = NSGA3Optimizer::new(new_optimizer_config(&problem, 8, 50)).unwrap();
    let mut early_stop = EarlyStop::new(0);
    let mut counter = GenerationCounter::default();
    let mut iterate = starting_point(&problem);

    optimizer.optimize(&problem.objectives(), &mut iterate, &mut [&mut early_stop, &mut counter]).unwrap();

    assert_eq!(counter.generations, vec![1]);
    assert_eq!(counter.ends, 1);
}

#[test]
fn raised_stop_flag_skips_all_generations() {
    let problem = Zdt1::new(2);
    let mut optimizer = NSGA3Optimizer::new(new_optimizer_config(&problem, 8, 50)).unwrap();
    let mut stop_flag = StopFlag::default();
    stop_flag.stop();
    let mut counter = GenerationCounter::default();
    let mut iterate = starting_point(&problem);

    optimizer.optimize(&problem.objectives(), &mut iterate, &mut [&mut stop_flag, &mut counter]).unwrap();

    assert!(counter.generations.is_empty());
    assert_eq!(counter.ends, 1);
    assert!(optimizer.pareto_set().nrows() > 0);
}

#[test]
fn efficient_sorting_converges_too() {
    let problem = Zdt1::new(1);
    let config = OptimizerConfig {
        sorting: SortingAlgorithm::EfficientNonDominated,
        ..new_optimizer_config(&problem, 20, 30)
    };
    let mut optimizer = NSGA3Optimizer::new(config).unwrap();
    let mut iterate = vec![0.5];

    optimizer.optimize(&problem.objectives(), &mut iterate, &mut []).unwrap();

    assert!(optimizer.pareto_front().nrows() > 0);
    for point in optimizer.pareto_front().rows() {
        assert!((point[1] - (1.0 - point[0].sqrt())).abs() < 1e-9);
    }
}

#[test]
fn mismatched_bounds_fail_before_running() {
    let problem = Zdt1::new(3);
    let config = OptimizerConfig {
        lower_bound: Bounds::PerVariable(vec![0.0, 0.0]),
        ..new_optimizer_config(&problem, 8, 5)
    };
    let mut optimizer = NSGA3Optimizer::new(config).unwrap();
    let mut counter = GenerationCounter::default();
    let mut iterate = starting_point(&problem);

    let result = optimizer.optimize(&problem.objectives(), &mut iterate, &mut [&mut counter]);

    assert!(matches!(result, Err(Error::BoundsDimensionMismatch { bound: "lower_bound", got: 2, expected: 3 })));
    assert_eq!(counter.begins, 0);
    assert_eq!(optimizer.pareto_set().nrows(), 0);
}

#[test]
fn missing_objectives_or_variables_fail() {
    let mut optimizer = NSGA3Optimizer::new(OptimizerConfig { seed: Some(1), ..Default::default() }).unwrap();
    let objectives: Objectives = vec![Box::new(|x: &[f64]| x[0]) as Box<dyn Objective>];

    assert!(matches!(optimizer.optimize(&[], &mut [0.5], &mut []), Err(Error::NoObjectives)));
    assert!(matches!(optimizer.optimize(&objectives, &mut [], &mut []), Err(Error::EmptyIterate)));
}

#[test]
fn reference_directions_must_match_objectives() {
    let problem = Zdt1::new(2);
    let config = OptimizerConfig {
        survival: SurvivalStrategy::ReferenceDirections,
        reference_directions: Some(vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]),
        ..new_optimizer_config(&problem, 8, 5)
    };
    let mut optimizer = NSGA3Optimizer::new(config).unwrap();
    let mut iterate = starting_point(&problem);

    assert!(matches!(
        optimizer.optimize(&problem.objectives(), &mut iterate, &mut []),
        Err(Error::ReferenceDirectionsMismatch { expected: 2, got: 3 })
    ));
}

#[cfg(feature = "plot")]
#[test]
#[ignore = "renders images to the temp directory"]
fn print_fronts_for_optimizers() {
    let problem_solver = ProblemsSolver::new(
        vec![Box::new(Dtlz1::new(7, 3)) as Box<dyn Problem>, Box::new(Zdt1::new(5))],
        optimizer_creators()
    );
    let dir = std::env::temp_dir();

    for (optimizer, problem, best_solutions) in problem_solver.iter_optimizer_problem_best_solution(40, 100) {
        let rows: Vec<Vec<f64>> = best_solutions.into_iter().map(|(objectives, _)| objectives).collect();
        let front = ndarray::Array2::from_shape_fn((rows.len(), rows[0].len()), |(row, column)| rows[row][column]);

        crate::mo::plot::draw_front(&front,
                                    &format!("{} - {}", problem.name(), optimizer.name()),
                                    &dir.join(format!("{} - {}.png", optimizer.name(), problem.name())))
            .unwrap();
    }
}
