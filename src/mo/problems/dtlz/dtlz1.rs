use crate::mo::problem::Problem;
use crate::mo::problems::dtlz::g1;
use crate::mo::{Objective, Objectives};

#[derive(Clone)]
pub struct Dtlz1
{
    name: String,
    n_var: usize,
    n_obj: usize
}

impl Dtlz1 {
    /// `n_var` must be at least `n_obj`.
    pub fn new(n_var: usize, n_obj: usize) -> Self
    {
        Dtlz1 {
            name: format!("DTLZ1 ({} {})", n_var, n_obj),
            n_var,
            n_obj
        }
    }

    pub fn objective(&self, in_x: &[f64], i: usize) -> f64
    {
        let x = &in_x[..self.n_obj - 1];
        let x_m = &in_x[self.n_obj - 1..];

        let mut f_val = 0.5 * (1.0 + g1(x_m));

        for x_i in &x[..x.len() - i]
        {
            f_val *= x_i;
        }

        if i > 0
        {
            f_val *= 1.0 - x[x.len() - i];
        }

        f_val
    }
}

impl Problem for Dtlz1
{
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn variables_len(&self) -> usize {
        self.n_var
    }

    fn objectives(&self) -> Objectives {
        (0..self.n_obj)
            .map(|i| {
                let problem = self.clone();

                Box::new(move |x: &[f64]| problem.objective(x, i)) as Box<dyn Objective>
            })
            .collect()
    }

    fn lower_bound(&self) -> f64 {
        0.0
    }

    fn upper_bound(&self) -> f64 {
        1.0
    }

    fn convergence_metric(&self, in_x: &[f64]) -> f64 {
        let x_m = &in_x[self.n_obj - 1..];

        g1(x_m)
    }
}
