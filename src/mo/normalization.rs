use itertools::Itertools;
use ndarray::{Array1, Array2};
use tracing::debug;

const PROBE_EPSILON: f64 = 1e-6;
const SINGULAR_PIVOT: f64 = 1e-12;

/// Per-objective minimum over the selected candidates.
pub fn ideal_point(objectives: &[Vec<f64>], indices: &[usize]) -> Vec<f64>
{
    let Some(&first) = indices.first() else {
        return vec![];
    };

    let mut ideal_point = objectives[first].clone();

    for &index in indices.iter().skip(1)
    {
        for (ideal, &value) in ideal_point.iter_mut().zip(&objectives[index])
        {
            if value < *ideal
            {
                *ideal = value;
            }
        }
    }

    ideal_point
}

/// Shift every point so that `origin` lands on zero.
pub fn shift(points: &[Vec<f64>], origin: &[f64]) -> Vec<Vec<f64>>
{
    points.iter()
        .map(|point| point.iter().zip(origin).map(|(value, origin)| value - origin).collect())
        .collect()
}

/// Squared perpendicular distance of each point from the line through
/// `point_a` and `point_b`.
pub fn point_to_line_distance(points: &[Vec<f64>], point_a: &[f64], point_b: &[f64]) -> Vec<f64>
{
    let ba: Vec<f64> = point_b.iter().zip(point_a).map(|(b, a)| b - a).collect();
    let ba_dot: f64 = ba.iter().map(|v| v * v).sum();

    points.iter()
        .map(|point| {
            let pa: Vec<f64> = point.iter().zip(point_a).map(|(p, a)| p - a).collect();
            let t = pa.iter().zip(&ba).map(|(p, b)| p * b).sum::<f64>() / ba_dot;

            pa.iter()
                .zip(&ba)
                .map(|(p, b)| (p - t * b).powi(2))
                .sum()
        })
        .collect()
}

/// Indices of the extreme point of every objective axis.
///
/// `points` must already be shifted by the ideal point. Fronts with fewer
/// points than objectives get the trivial mapping `0..len`.
pub fn find_extreme_points(points: &[Vec<f64>]) -> Vec<usize>
{
    let objectives_len = points.first().map_or(0, |point| point.len());

    if points.len() < objectives_len
    {
        return (0..points.len()).collect();
    }

    let origin = vec![0.0; objectives_len];
    let mut selected = vec![false; points.len()];
    let mut indices = Vec::with_capacity(objectives_len);

    for axis in 0..objectives_len
    {
        let direction: Vec<f64> = (0..objectives_len)
            .map(|j| if j == axis { 1.0 + PROBE_EPSILON } else { PROBE_EPSILON })
            .collect();

        let mut dists = point_to_line_distance(points, &origin, &direction);
        for (point_index, is_selected) in selected.iter().enumerate()
        {
            if *is_selected
            {
                dists[point_index] = f64::INFINITY;
            }
        }

        let index = dists.iter()
            .position_min_by(|a, b| a.total_cmp(b))
            .unwrap_or(0);

        indices.push(index);
        selected[index] = true;
    }

    indices
}

fn maxima(points: &[Vec<f64>]) -> Vec<f64>
{
    let mut result = match points.first() {
        Some(point) => point.clone(),
        None => return vec![]
    };

    for point in points.iter().skip(1)
    {
        for (max, &value) in result.iter_mut().zip(point)
        {
            if *max < value
            {
                *max = value;
            }
        }
    }

    result
}

fn replace_zeros(normalization: Vec<f64>) -> Vec<f64>
{
    normalization.into_iter()
        .map(|value| if value == 0.0 { 1.0 } else { value })
        .collect()
}

/// Solve `a · x = b` by gaussian elimination with partial pivoting.
/// Returns `None` for a singular system.
pub fn solve_linear_system(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>>
{
    let n = b.len();
    if a.nrows() != n || a.ncols() != n
    {
        return None;
    }

    for column in 0..n
    {
        let pivot = (column..n)
            .max_by(|&r1, &r2| a[[r1, column]].abs().total_cmp(&a[[r2, column]].abs()))?;

        if !(a[[pivot, column]].abs() > SINGULAR_PIVOT)
        {
            return None;
        }

        if pivot != column
        {
            for k in 0..n
            {
                a.swap([pivot, k], [column, k]);
            }
            b.swap(pivot, column);
        }

        for row in (column + 1)..n
        {
            let factor = a[[row, column]] / a[[column, column]];
            if factor == 0.0
            {
                continue;
            }

            for k in column..n
            {
                a[[row, k]] -= factor * a[[column, k]];
            }
            b[row] -= factor * b[column];
        }
    }

    let mut x = Array1::zeros(n);
    for row in (0..n).rev()
    {
        let tail: f64 = ((row + 1)..n).map(|k| a[[row, k]] * x[k]).sum();
        x[row] = (b[row] - tail) / a[[row, row]];
    }

    Some(x)
}

/// Per-objective scale factors from the hyperplane through the extreme
/// points, or the per-objective maxima when that plane is unusable.
///
/// `points` must already be shifted by the ideal point. The result never
/// contains zeros.
pub fn normalization_vector(points: &[Vec<f64>], extremes: &[usize]) -> Vec<f64>
{
    let objectives_len = points.first().map_or(0, |point| point.len());

    if points.len() < objectives_len
    {
        debug!(front = points.len(), objectives = objectives_len, "front too small, normalizing by maxima");
        return replace_zeros(maxima(points));
    }

    if extremes.len() != objectives_len || extremes.iter().unique().count() != extremes.len()
    {
        debug!(?extremes, "extreme points are not distinct, normalizing by maxima");
        return replace_zeros(maxima(points));
    }

    let a = Array2::from_shape_fn((objectives_len, objectives_len), |(row, column)| points[extremes[row]][column]);
    let b = Array1::ones(objectives_len);

    let Some(hyperplane) = solve_linear_system(a, b) else {
        debug!("hyperplane through extreme points is singular, normalizing by maxima");
        return replace_zeros(maxima(points));
    };

    if hyperplane.iter().any(|w| !w.is_finite() || *w < 0.0)
    {
        debug!(?hyperplane, "hyperplane is invalid, normalizing by maxima");
        return replace_zeros(maxima(points));
    }

    let normalization: Vec<f64> = hyperplane.iter().map(|w| 1.0 / w).collect();

    if normalization.iter().any(|value| !value.is_finite())
    {
        debug!("hyperplane has a zero intercept weight, normalizing by maxima");
        return replace_zeros(maxima(points));
    }

    replace_zeros(normalization)
}

/// Divide every point by the normalization vector.
pub fn normalize(points: &[Vec<f64>], normalization: &[f64]) -> Vec<Vec<f64>>
{
    points.iter()
        .map(|point| point.iter().zip(normalization).map(|(value, scale)| value / scale).collect())
        .collect()
}
