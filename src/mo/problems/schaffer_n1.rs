use crate::mo::problem::Problem;
use crate::mo::{Objective, Objectives};

/// Schaffer's problem No.1: `f1 = x²`, `f2 = (x - 2)²`, optimal for `x ∈ [0, 2]`.
#[derive(Clone)]
pub struct SchafferN1
{
    bound: f64
}

impl SchafferN1 {
    pub fn new(bound: f64) -> Self
    {
        SchafferN1 {
            bound: bound.abs()
        }
    }
}

impl Default for SchafferN1
{
    fn default() -> Self {
        SchafferN1::new(10.0)
    }
}

impl Problem for SchafferN1
{
    fn name(&self) -> &str {
        "Schaffer N1"
    }

    fn variables_len(&self) -> usize {
        1
    }

    fn objectives(&self) -> Objectives {
        vec![
            Box::new(|x: &[f64]| x[0].powi(2)) as Box<dyn Objective>,
            Box::new(|x: &[f64]| (x[0] - 2.0).powi(2))
        ]
    }

    fn lower_bound(&self) -> f64 {
        -self.bound
    }

    fn upper_bound(&self) -> f64 {
        self.bound
    }

    fn convergence_metric(&self, x: &[f64]) -> f64 {
        (-x[0]).max(x[0] - 2.0).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_is_zero_between_optima() {
        let problem = SchafferN1::default();

        assert_eq!(problem.convergence_metric(&[0.0]), 0.0);
        assert_eq!(problem.convergence_metric(&[1.3]), 0.0);
        assert_eq!(problem.convergence_metric(&[2.5]), 0.5);
        assert_eq!(problem.convergence_metric(&[-1.0]), 1.0);
    }
}
