use crate::model::kinetics::KineticParams;
use crate::model::regime::PercentWindow;
use crate::pipeline::SimError;
use crate::solver::{OdeSystem, SolverOptions, solve_dense};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub t1: f64,
    pub t2: f64,
}

/// `dt/du = 1 / (alpha - beta*u)`, integrated with u as the abscissa.
struct InverseRate {
    alpha: f64,
    beta: f64,
}

impl OdeSystem<1> for InverseRate {
    fn derivative(&self, u: f64, _t: &[f64; 1], dt: &mut [f64; 1]) {
        dt[0] = 1.0 / (self.alpha - self.beta * u);
    }
}

/// Asymptote of u for a regime starting at `u0`: alpha/beta under
/// production, `u0` itself for pure decay (percentages then count the
/// fraction already lost).
pub fn saturation_level(u0: f64, rates: &KineticParams) -> f64 {
    if rates.alpha != 0.0 {
        rates.alpha / rates.beta
    } else {
        u0
    }
}

/// Unspliced abundances at the window's start and end milestones.
pub fn percent_targets(u0: f64, rates: &KineticParams, window: &PercentWindow) -> (f64, f64) {
    let u_max = saturation_level(u0, rates);
    if rates.alpha != 0.0 {
        (
            u0 + (u_max - u0) * window.start_pct / 100.0,
            u0 + (u_max - u0) * window.end_pct / 100.0,
        )
    } else {
        (
            u_max * (100.0 - window.start_pct) / 100.0,
            u_max * (100.0 - window.end_pct) / 100.0,
        )
    }
}

/// Converts a percentage window into absolute times measured from the
/// moment the regime starts at `u0`.
pub fn invert_window(
    u0: f64,
    rates: &KineticParams,
    window: &PercentWindow,
    opts: &SolverOptions,
) -> Result<TimeWindow, SimError> {
    rates.validate()?;
    let (u_start, u_end) = percent_targets(u0, rates, window);

    let asymptote = if rates.alpha != 0.0 {
        rates.alpha / rates.beta
    } else {
        0.0
    };
    if window.end_pct >= 100.0 && u0 != asymptote {
        return Err(SimError::Unreachable(format!(
            "{}% of the way from u={u0} to u={asymptote} is only reached as t -> inf",
            window.end_pct
        )));
    }

    let system = InverseRate {
        alpha: rates.alpha,
        beta: rates.beta,
    };
    let solution = solve_dense(&system, u0, u_end, [0.0], opts)?;
    let t2 = solution.eval(u_end)[0];
    let t1 = solution.eval(u_start)[0];
    if !t1.is_finite() || !t2.is_finite() || t2 < 0.0 {
        return Err(SimError::Unreachable(format!(
            "window {}%..{}% maps to times [{t1}, {t2}]",
            window.start_pct, window.end_pct
        )));
    }
    // Interpolation rounding can push t1 marginally outside [0, t2].
    Ok(TimeWindow {
        t1: t1.clamp(0.0, t2),
        t2,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_invert.rs"]
mod tests;
