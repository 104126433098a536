//! Quality indicators comparing an achieved Pareto front against a reference
//! front. Both fronts hold one point per row.

use ndarray::{Array2, ArrayView1};

fn euclidean_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64
{
    a.iter()
        .zip(b.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn dominance_distance(point: ArrayView1<f64>, reference: ArrayView1<f64>) -> f64
{
    point.iter()
        .zip(reference.iter())
        .map(|(p, r)| (p - r).max(0.0).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn nearest<F>(front: &Array2<f64>, reference: ArrayView1<f64>, distance: F) -> f64
    where
        F: Fn(ArrayView1<f64>, ArrayView1<f64>) -> f64
{
    front.rows()
        .into_iter()
        .map(|point| distance(point, reference))
        .fold(f64::INFINITY, f64::min)
}

/// Multiplicative epsilon indicator: the smallest factor by which the front
/// must be scaled to weakly dominate every reference point.
///
/// Returns `-inf` for an empty reference front.
pub fn epsilon(front: &Array2<f64>, reference: &Array2<f64>) -> f64
{
    reference.rows()
        .into_iter()
        .map(|reference_point| {
            front.rows()
                .into_iter()
                .map(|point| {
                    point.iter()
                        .zip(reference_point.iter())
                        .map(|(p, r)| p / r)
                        .fold(f64::NEG_INFINITY, f64::max)
                })
                .fold(f64::INFINITY, f64::min)
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Inverted generational distance with power `p`.
pub fn igd(front: &Array2<f64>, reference: &Array2<f64>, p: f64) -> f64
{
    if reference.nrows() == 0
    {
        return 0.0;
    }

    let sum: f64 = reference.rows()
        .into_iter()
        .map(|reference_point| nearest(front, reference_point, euclidean_distance).powf(p))
        .sum();

    sum.powf(1.0 / p) / reference.nrows() as f64
}

/// IGD+: like [`igd`] with `p = 1`, but only the components where the front
/// is worse than the reference point count towards the distance.
pub fn igd_plus(front: &Array2<f64>, reference: &Array2<f64>) -> f64
{
    if reference.nrows() == 0
    {
        return 0.0;
    }

    let sum: f64 = reference.rows()
        .into_iter()
        .map(|reference_point| nearest(front, reference_point, dominance_distance))
        .sum();

    sum / reference.nrows() as f64
}
