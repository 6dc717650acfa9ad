pub mod dopri5;

pub use dopri5::solve_dense;

use thiserror::Error;

/// Right-hand side of an autonomous or time-dependent ODE `dy/dt = f(t, y)`.
pub trait OdeSystem<const N: usize> {
    fn derivative(&self, t: f64, y: &[f64; N], dy: &mut [f64; N]);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    pub rtol: f64,
    pub atol: f64,
    pub max_steps: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-3,
            atol: 1e-6,
            max_steps: 1_000_000,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("required step size is less than spacing between numbers (t = {t})")]
    StepSizeTooSmall { t: f64 },
    #[error("step budget of {max_steps} exhausted at t = {t}")]
    MaxStepsExceeded { max_steps: usize, t: f64 },
    #[error("derivative is not finite at t = {t}")]
    NonFiniteDerivative { t: f64 },
    #[error("integration bounds must be finite (got {t0} -> {t_bound})")]
    InvalidSpan { t0: f64, t_bound: f64 },
}

/// Quartic interpolant covering one accepted step.
#[derive(Debug, Clone)]
pub(crate) struct DenseStep<const N: usize> {
    pub t_old: f64,
    pub t_new: f64,
    pub y_old: [f64; N],
    pub q: [[f64; 4]; N],
}

impl<const N: usize> DenseStep<N> {
    fn eval(&self, t: f64) -> [f64; N] {
        let h = self.t_new - self.t_old;
        let x = (t - self.t_old) / h;
        let p = [x, x * x, x * x * x, x * x * x * x];
        let mut y = self.y_old;
        for (i, yi) in y.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (j, pj) in p.iter().enumerate() {
                acc += self.q[i][j] * pj;
            }
            *yi += h * acc;
        }
        y
    }
}

/// Continuous solution over `[t0, t_bound]`, queryable at any abscissa.
///
/// Queries outside the integrated span extrapolate with the nearest step's
/// interpolant.
#[derive(Debug, Clone)]
pub struct DenseSolution<const N: usize> {
    t0: f64,
    t_bound: f64,
    y0: [f64; N],
    y_end: [f64; N],
    steps: Vec<DenseStep<N>>,
}

impl<const N: usize> DenseSolution<N> {
    pub(crate) fn new(
        t0: f64,
        t_bound: f64,
        y0: [f64; N],
        y_end: [f64; N],
        steps: Vec<DenseStep<N>>,
    ) -> Self {
        Self {
            t0,
            t_bound,
            y0,
            y_end,
            steps,
        }
    }

    /// State of the last accepted step, exactly at `t_bound`.
    pub fn final_state(&self) -> [f64; N] {
        self.y_end
    }

    pub fn n_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn eval(&self, t: f64) -> [f64; N] {
        if self.steps.is_empty() {
            return self.y0;
        }
        let dir = if self.t_bound >= self.t0 { 1.0 } else { -1.0 };
        let key = dir * t;
        // Steps are stored in integration order, so `dir * t_new` is ascending.
        let ind = self.steps.partition_point(|s| dir * s.t_new < key);
        let idx = ind.min(self.steps.len() - 1);
        self.steps[idx].eval(t)
    }

    pub fn eval_many(&self, ts: &[f64]) -> Vec<[f64; N]> {
        ts.iter().map(|&t| self.eval(t)).collect()
    }
}

/// `n` evenly spaced points on `[start, end]`, endpoints included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            out[n - 1] = end;
            out
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/solver/mod.rs"]
mod tests;
