use std::cmp::Ordering;

use crate::mo::fast_nondominated_sorting::dominates;

fn lexicographic_cmp(vals1: &[f64], vals2: &[f64]) -> Ordering
{
    vals1.iter()
        .zip(vals2)
        .map(|(v1, v2)| v1.total_cmp(v2))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Efficient non-dominated sort with sequential search.
///
/// Candidates are visited in lexicographic order of their objectives, so no
/// candidate can be dominated by one visited after it. Each candidate is put
/// in the first front holding nothing that dominates it.
pub fn ens_nondominated_sort(objectives: &[Vec<f64>]) -> (Vec<Vec<usize>>, Vec<usize>)
{
    let mut order: Vec<usize> = (0..objectives.len()).collect();
    order.sort_by(|&a, &b| lexicographic_cmp(&objectives[a], &objectives[b]));

    let mut fronts: Vec<Vec<usize>> = vec![];
    let mut ranks = vec![0usize; objectives.len()];

    for index in order
    {
        let k = sequential_search(objectives, index, &fronts);
        if k == fronts.len() {
            fronts.push(vec![index]);
        } else {
            fronts[k].push(index);
        }

        ranks[index] = k;
    }

    (fronts, ranks)
}

fn sequential_search(objectives: &[Vec<f64>], index: usize, fronts: &[Vec<usize>]) -> usize
{
    let p = &objectives[index];
    let mut k = 0;
    let x = fronts.len();
    while k < x {
        let mut dominated = false;
        for &front_index in fronts[k].iter().rev() {
            if dominates(&objectives[front_index], p) {
                dominated = true;
                break;
            }
        }
        if !dominated {
            return k;
        }
        k += 1;
    }
    x
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use crate::mo::fast_nondominated_sorting::fast_nondominated_sort;
    use super::*;

    #[test]
    fn agrees_with_fast_sort() {
        let mut rng = StdRng::seed_from_u64(17);

        for objectives_len in 2..5 {
            let objectives: Vec<Vec<f64>> = (0..80)
                .map(|_| (0..objectives_len).map(|_| rng.gen_range(0..6) as f64).collect())
                .collect();

            let (mut ens_fronts, ens_ranks) = ens_nondominated_sort(&objectives);
            let (mut fast_fronts, fast_ranks) = fast_nondominated_sort(&objectives);

            assert_eq!(ens_ranks, fast_ranks);

            ens_fronts.iter_mut().for_each(|front| front.sort_unstable());
            fast_fronts.iter_mut().for_each(|front| front.sort_unstable());
            assert_eq!(ens_fronts, fast_fronts);
        }
    }

    #[test]
    fn duplicates_share_a_front() {
        let objectives = vec![vec![1.0, 1.0], vec![0.0, 2.0], vec![1.0, 1.0], vec![2.0, 2.0]];

        let (fronts, ranks) = ens_nondominated_sort(&objectives);

        assert_eq!(fronts.len(), 2);
        assert_eq!(ranks, vec![0, 0, 0, 1]);
    }
}
