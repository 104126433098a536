pub mod dtlz1;

/// Rastrigin-like distance function of DTLZ1; 0 when every `x_m` is 0.5.
pub fn g1(x_m: &[f64]) -> f64
{
    let mut sum = 0.0;

    for x_m_i in x_m
    {
        sum += (x_m_i - 0.5).powi(2) - (20.0 * std::f64::consts::PI * (x_m_i - 0.5)).cos();
    }

    100.0 * (x_m.len() as f64 + sum)
}
