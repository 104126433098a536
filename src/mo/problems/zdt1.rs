use crate::mo::problem::Problem;
use crate::mo::{Objective, Objectives};

/// ZDT1: convex two-objective front `f2 = 1 - sqrt(f1)`, reached when every
/// variable but the first is 0.
#[derive(Clone)]
pub struct Zdt1
{
    name: String,
    n_var: usize
}

impl Zdt1 {
    pub fn new(n_var: usize) -> Self
    {
        Zdt1 {
            name: format!("ZDT1 ({})", n_var),
            n_var
        }
    }
}

fn g(x: &[f64]) -> f64
{
    let tail = &x[1.min(x.len())..];

    if tail.is_empty()
    {
        return 1.0;
    }

    1.0 + 9.0 * tail.iter().sum::<f64>() / tail.len() as f64
}

impl Problem for Zdt1
{
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn variables_len(&self) -> usize {
        self.n_var
    }

    fn objectives(&self) -> Objectives {
        vec![
            Box::new(|x: &[f64]| x[0]) as Box<dyn Objective>,
            Box::new(|x: &[f64]| {
                let g = g(x);

                g * (1.0 - (x[0] / g).sqrt())
            })
        ]
    }

    fn lower_bound(&self) -> f64 {
        0.0
    }

    fn upper_bound(&self) -> f64 {
        1.0
    }

    fn convergence_metric(&self, x: &[f64]) -> f64 {
        g(x) - 1.0
    }
}
