use itertools::Itertools;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OptimizerConfig;
use crate::error::Error;
use crate::mo::normalization::{find_extreme_points, ideal_point, normalization_vector, normalize, point_to_line_distance, shift};
use crate::mo::reference_directions::{das_dennis, default_partitions};

const MIN_DISTANCE: f64 = 1e-8;
const MIN_CURVATURE: f64 = 0.1;
const MAX_CURVATURE: f64 = 20.0;
const NEWTON_ITERATIONS: usize = 100;
const NEWTON_PRECISION: f64 = 1e-6;

/// How candidates sharing a rank are told apart during truncation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurvivalStrategy
{
    /// Front geometry estimation with crowding on the fitted manifold.
    #[default]
    Geometry,
    /// Niching around a fixed set of reference directions.
    ReferenceDirections
}

/// A resolved survival strategy, ready to score populations.
#[derive(Debug, Clone)]
pub enum Survival
{
    Geometry,
    ReferenceDirections(Array2<f64>)
}

impl Survival
{
    pub fn from_config(config: &OptimizerConfig, objectives_len: usize) -> Result<Self, Error>
    {
        match config.survival {
            SurvivalStrategy::Geometry => Ok(Survival::Geometry),
            SurvivalStrategy::ReferenceDirections => {
                let directions = match &config.reference_directions {
                    Some(rows) => directions_from_rows(rows, objectives_len)?,
                    None => {
                        let partitions = config.reference_partitions
                            .unwrap_or_else(|| default_partitions(objectives_len, config.population_size));

                        das_dennis(objectives_len, partitions)
                    }
                };

                debug!(directions = directions.nrows(), "reference directions prepared");

                Ok(Survival::ReferenceDirections(directions))
            }
        }
    }

    pub fn strategy(&self) -> SurvivalStrategy
    {
        match self {
            Survival::Geometry => SurvivalStrategy::Geometry,
            Survival::ReferenceDirections(_) => SurvivalStrategy::ReferenceDirections
        }
    }

    /// Score every candidate of a sorted population; higher is better within
    /// a rank.
    ///
    /// Fronts `0..=boundary_front` form the selection set, later fronts
    /// score 0.
    pub fn scores<R: Rng + ?Sized>(&self,
                                   rng: &mut R,
                                   objectives: &[Vec<f64>],
                                   fronts: &[Vec<usize>],
                                   boundary_front: usize) -> Vec<f64>
    {
        let selected_fronts = &fronts[..(boundary_front + 1).min(fronts.len())];
        let selection = selected_fronts.concat();
        let ideal = ideal_point(objectives, &selection);

        match self {
            Survival::Geometry => geometry_scores(objectives, selected_fronts, &ideal),
            Survival::ReferenceDirections(directions) =>
                niching_scores(rng, objectives, selected_fronts, &ideal, directions)
        }
    }
}

fn directions_from_rows(rows: &[Vec<f64>], objectives_len: usize) -> Result<Array2<f64>, Error>
{
    let Some(first) = rows.first() else {
        return Err(Error::ReferenceDirectionsMismatch { expected: objectives_len, got: 0 });
    };

    if let Some(row) = rows.iter().find(|row| row.len() != objectives_len)
    {
        return Err(Error::ReferenceDirectionsMismatch { expected: objectives_len, got: row.len() });
    }

    Ok(Array2::from_shape_fn((rows.len(), first.len()), |(row, column)| rows[row][column]))
}

fn gather(objectives: &[Vec<f64>], indices: &[usize]) -> Vec<Vec<f64>>
{
    indices.iter()
        .map(|&index| objectives[index].clone())
        .collect()
}

fn minkowski_norm(point: &[f64], p: f64) -> f64
{
    point.iter()
        .map(|value| value.abs().powf(p))
        .sum::<f64>()
        .powf(1.0 / p)
}

fn euclidean_distance(a: &[f64], b: &[f64]) -> f64
{
    a.iter()
        .zip(b)
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn project_on_manifold(point: &[f64], p: f64) -> Vec<f64>
{
    let norm = point.iter()
        .filter(|&&value| value > 0.0)
        .map(|value| value.powf(p))
        .sum::<f64>()
        .powf(1.0 / p);

    if !(norm > MIN_DISTANCE)
    {
        return point.to_vec();
    }

    point.iter().map(|value| value / norm).collect()
}

/// Solve `Σ xᵢᵖ = 1` for `p` by Newton–Raphson on its logarithm.
fn newton_curvature(point: &[f64]) -> f64
{
    let mut p = 1.0;

    for _ in 0..NEWTON_ITERATIONS
    {
        let positive = point.iter().filter(|&&value| value > 0.0);

        let sum: f64 = positive.clone().map(|value| value.powf(p)).sum();
        if !(sum > 0.0)
        {
            return 1.0;
        }

        let slope = positive.map(|value| value.powf(p) * value.ln()).sum::<f64>() / sum;
        if slope == 0.0 || !slope.is_finite()
        {
            return 1.0;
        }

        let next = p - sum.ln() / slope;
        if (next - p).abs() <= NEWTON_PRECISION
        {
            return next;
        }

        p = next;
    }

    p
}

/// Curvature of a normalized front, estimated from the non-extreme point
/// closest to the diagonal.
fn front_curvature(normalized: &[Vec<f64>], extremes: &[usize]) -> f64
{
    let objectives_len = normalized.first().map_or(0, |point| point.len());

    let mut distances = point_to_line_distance(normalized, &vec![0.0; objectives_len], &vec![1.0; objectives_len]);
    for &extreme in extremes
    {
        distances[extreme] = f64::INFINITY;
    }

    let index = distances.iter().position_min_by(|a, b| a.total_cmp(b));

    let p = match index {
        Some(index) if distances[index].is_finite() => newton_curvature(&normalized[index]),
        _ => 1.0
    };

    if p.is_nan() || p <= MIN_CURVATURE
    {
        1.0
    }
    else
    {
        p.min(MAX_CURVATURE)
    }
}

/// Distances between points projected on the `p`-manifold, each row divided
/// by the norm of its point.
fn pairwise_distances(normalized: &[Vec<f64>], p: f64) -> Vec<Vec<f64>>
{
    let len = normalized.len();
    let projected: Vec<Vec<f64>> = normalized.iter()
        .map(|point| project_on_manifold(point, p))
        .collect();

    let mut distances = vec![vec![0.0; len]; len];

    for i in 0..len
    {
        for j in (i + 1)..len
        {
            let distance =
                if 0.95 < p && p < 1.05 {
                    euclidean_distance(&projected[i], &projected[j])
                } else {
                    let midpoint: Vec<f64> = projected[i].iter()
                        .zip(&projected[j])
                        .map(|(a, b)| (a + b) / 2.0)
                        .collect();
                    let midpoint = project_on_manifold(&midpoint, p);

                    euclidean_distance(&projected[i], &midpoint) + euclidean_distance(&midpoint, &projected[j])
                };

            distances[i][j] = distance;
            distances[j][i] = distance;
        }
    }

    for (row, point) in distances.iter_mut().zip(normalized)
    {
        let norm = minkowski_norm(point, p);
        let norm = if norm < MIN_DISTANCE { 1.0 } else { norm };

        for distance in row.iter_mut()
        {
            *distance = distance.max(MIN_DISTANCE) / norm;
        }
    }

    distances
}

fn nearest_selected_sum(distances: &[f64], selected: &[usize]) -> f64
{
    let mut first = f64::INFINITY;
    let mut second = f64::INFINITY;

    for &index in selected
    {
        let distance = distances[index];

        if distance < first
        {
            second = first;
            first = distance;
        }
        else if distance < second
        {
            second = distance;
        }
    }

    if selected.len() == 1 { first } else { first + second }
}

/// Greedy crowding: extremes first, then repeatedly the point farthest from
/// its two nearest already selected neighbours.
fn crowding_distances(normalized: &[Vec<f64>], extremes: &[usize], p: f64) -> Vec<f64>
{
    let len = normalized.len();
    let mut crowding = vec![0.0; len];
    let mut selected_indices: Vec<usize> = extremes.iter().copied().unique().collect();

    for &extreme in &selected_indices
    {
        crowding[extreme] = f64::INFINITY;
    }

    let mut remaining: Vec<usize> = (0..len)
        .filter(|index| !selected_indices.contains(index))
        .collect();

    if selected_indices.is_empty()
    {
        return crowding;
    }

    let distances = pairwise_distances(normalized, p);

    while !remaining.is_empty()
    {
        let best = remaining.iter()
            .enumerate()
            .map(|(position, &index)| (position, nearest_selected_sum(&distances[index], &selected_indices)))
            .min_by(|a, b| b.1.total_cmp(&a.1));

        let Some((position, value)) = best else {
            break;
        };

        let index = remaining.remove(position);
        crowding[index] = value;
        selected_indices.push(index);
    }

    crowding
}

/// Front 0 gets crowding scores on its estimated manifold, later fronts the
/// reciprocal of their `p`-distance from the ideal point.
pub fn geometry_scores(objectives: &[Vec<f64>], fronts: &[Vec<usize>], ideal: &[f64]) -> Vec<f64>
{
    let mut scores = vec![0.0; objectives.len()];

    let Some(first_front) = fronts.first() else {
        return scores;
    };

    let objectives_len = ideal.len();
    let points = shift(&gather(objectives, first_front), ideal);

    let (normalization, p) =
        if points.len() < objectives_len {
            debug!(front = points.len(), objectives = objectives_len, "first front smaller than objective count");

            (normalization_vector(&points, &[]), 1.0)
        } else {
            let extremes = find_extreme_points(&points);
            let normalization = normalization_vector(&points, &extremes);
            let normalized = normalize(&points, &normalization);

            let p = front_curvature(&normalized, &extremes);
            debug!(p, "front curvature estimated");

            for (&index, score) in first_front.iter().zip(crowding_distances(&normalized, &extremes, p))
            {
                scores[index] = score;
            }

            (normalization, p)
        };

    for front in fronts.iter().skip(1)
    {
        for &index in front
        {
            let point: Vec<f64> = objectives[index].iter()
                .zip(ideal)
                .zip(&normalization)
                .map(|((value, ideal), scale)| (value - ideal) / scale)
                .collect();

            scores[index] = 1.0 / minkowski_norm(&point, p);
        }
    }

    scores
}

/// Nearest reference direction and squared perpendicular distance to it for
/// every point.
fn associate(normalized: &[Vec<f64>], directions: &Array2<f64>) -> (Vec<usize>, Vec<f64>)
{
    let origin = vec![0.0; directions.ncols()];
    let mut niches = vec![0usize; normalized.len()];
    let mut nearest = vec![f64::INFINITY; normalized.len()];

    for (niche, direction) in directions.rows().into_iter().enumerate()
    {
        let direction = direction.to_vec();

        for (point, distance) in point_to_line_distance(normalized, &origin, &direction).into_iter().enumerate()
        {
            if distance < nearest[point]
            {
                nearest[point] = distance;
                niches[point] = niche;
            }
        }
    }

    (niches, nearest)
}

/// Orders the last front of the selection set by niche preservation. The
/// first pick scores highest; all other candidates score 0.
pub fn niching_scores<R: Rng + ?Sized>(rng: &mut R,
                                       objectives: &[Vec<f64>],
                                       fronts: &[Vec<usize>],
                                       ideal: &[f64],
                                       directions: &Array2<f64>) -> Vec<f64>
{
    let mut scores = vec![0.0; objectives.len()];

    let Some(boundary) = fronts.last() else {
        return scores;
    };

    if directions.nrows() == 0
    {
        return scores;
    }

    let selection = fronts.concat();
    let points = shift(&gather(objectives, &selection), ideal);
    let extremes = find_extreme_points(&points);
    let normalization = normalization_vector(&points, &extremes);
    let normalized = normalize(&points, &normalization);

    let (niches, distances) = associate(&normalized, directions);

    let survivors_len = selection.len() - boundary.len();
    let mut niche_counts = vec![0usize; directions.nrows()];
    for &niche in &niches[..survivors_len]
    {
        niche_counts[niche] += 1;
    }

    // Positions into `selection`.
    let mut remaining: Vec<usize> = (survivors_len..selection.len()).collect();
    let mut score = remaining.len() as f64;

    while !remaining.is_empty()
    {
        let Some(min_count) = remaining.iter().map(|&position| niche_counts[niches[position]]).min() else {
            break;
        };

        let candidate_niches: Vec<usize> = remaining.iter()
            .map(|&position| niches[position])
            .filter(|&niche| niche_counts[niche] == min_count)
            .unique()
            .collect();

        let niche = candidate_niches[rng.gen_range(0..candidate_niches.len())];

        let members: Vec<usize> = (0..remaining.len())
            .filter(|&member| niches[remaining[member]] == niche)
            .collect();

        let member =
            if niche_counts[niche] == 0 {
                members.iter()
                    .copied()
                    .min_by(|&a, &b| distances[remaining[a]].total_cmp(&distances[remaining[b]]))
            } else {
                Some(members[rng.gen_range(0..members.len())])
            };

        let Some(member) = member else {
            break;
        };

        let position = remaining.remove(member);
        scores[selection[position]] = score;
        score -= 1.0;
        niche_counts[niche] += 1;
    }

    scores
}
