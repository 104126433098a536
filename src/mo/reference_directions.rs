use ndarray::Array2;

/// Number of Das–Dennis directions for `objectives_len` objectives split into
/// `partitions` steps, `C(partitions + objectives_len - 1, objectives_len - 1)`.
pub fn directions_count(objectives_len: usize, partitions: usize) -> usize
{
    if objectives_len == 0
    {
        return 0;
    }

    let n = (partitions + objectives_len - 1) as u128;
    let k = (objectives_len - 1) as u128;

    let mut count: u128 = 1;
    for i in 0..k
    {
        count = count * (n - i) / (i + 1);

        if count > usize::MAX as u128
        {
            return usize::MAX;
        }
    }

    count as usize
}

/// Smallest partition count giving at least half a population of directions.
pub fn default_partitions(objectives_len: usize, population_size: usize) -> usize
{
    let target = (population_size / 2).max(1);
    let mut partitions = 1;

    while directions_count(objectives_len, partitions) < target
    {
        partitions += 1;
    }

    partitions
}

/// Evenly spaced points on the unit simplex, one row per direction.
///
/// Every coordinate is a multiple of `1 / partitions` and every row sums to 1.
/// Zero partitions produce no directions.
pub fn das_dennis(objectives_len: usize, partitions: usize) -> Array2<f64>
{
    if objectives_len == 0 || partitions == 0
    {
        return Array2::zeros((0, objectives_len));
    }

    let mut rows = Vec::with_capacity(directions_count(objectives_len, partitions));
    let mut current = vec![0usize; objectives_len];

    fill_directions(&mut rows, &mut current, 0, partitions);

    Array2::from_shape_fn((rows.len(), objectives_len), |(row, column)| {
        rows[row][column] as f64 / partitions as f64
    })
}

fn fill_directions(rows: &mut Vec<Vec<usize>>, current: &mut Vec<usize>, axis: usize, left: usize)
{
    if axis + 1 == current.len()
    {
        current[axis] = left;
        rows.push(current.clone());
        return;
    }

    for value in 0..=left
    {
        current[axis] = value;
        fill_directions(rows, current, axis + 1, left - value);
    }
}
