/// Pareto dominance under minimization: `vals1` is no worse than `vals2` in
/// every objective and strictly better in at least one.
pub fn dominates(vals1: &[f64], vals2: &[f64]) -> bool
{
    let mut all_better_or_equal = true;
    let mut at_least_one_better = false;

    for (v1, v2) in vals1.iter().zip(vals2)
    {
        if v1 > v2
        {
            all_better_or_equal = false;
            break;
        }
        else if v1 < v2
        {
            at_least_one_better = true;
        }
    }

    all_better_or_equal && at_least_one_better
}

/// Sort a population into Pareto fronts by counting dominations.
///
/// Returns the fronts in increasing rank order and the rank of every index.
/// Every index of `objectives` appears in exactly one front.
pub fn fast_nondominated_sort(objectives: &[Vec<f64>]) -> (Vec<Vec<usize>>, Vec<usize>)
{
    let population_len = objectives.len();

    let mut domination_count = vec![0usize; population_len];
    let mut dominated: Vec<Vec<usize>> = vec![vec![]; population_len];
    let mut ranks = vec![0usize; population_len];

    let mut fronts = vec![];
    let mut current_front = vec![];

    for p in 0..population_len
    {
        for q in (p + 1)..population_len
        {
            if dominates(&objectives[p], &objectives[q])
            {
                dominated[p].push(q);
                domination_count[q] += 1;
            }
            else if dominates(&objectives[q], &objectives[p])
            {
                dominated[q].push(p);
                domination_count[p] += 1;
            }
        }
    }

    for p in 0..population_len
    {
        if domination_count[p] == 0
        {
            current_front.push(p);
        }
    }

    let mut rank = 0;
    while !current_front.is_empty()
    {
        let mut next_front = vec![];

        for &p in current_front.iter()
        {
            ranks[p] = rank;

            for &q in dominated[p].iter()
            {
                domination_count[q] -= 1;

                if domination_count[q] == 0
                {
                    next_front.push(q);
                }
            }
        }

        fronts.push(current_front);
        current_front = next_front;
        rank += 1;
    }

    (fronts, ranks)
}
