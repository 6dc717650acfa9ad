use crate::model::ModelError;
use crate::model::kinetics::{KineticParams, SplicingKinetics, State};
use crate::pipeline::SimError;
use crate::solver::{SolverOptions, linspace, solve_dense};

/// Evenly spaced samples of one integration plus the state reached at `t2`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledTrajectory {
    pub points: Vec<State>,
    pub end: State,
}

/// Samples the (u, s) trajectory at `samples` evenly spaced times in
/// `[t1, t2]`. The ODE is integrated once over `[0, t2]` from `start`.
pub fn generate_points(
    start: State,
    rates: &KineticParams,
    t1: f64,
    t2: f64,
    samples: usize,
    opts: &SolverOptions,
) -> Result<SampledTrajectory, SimError> {
    if samples == 0 {
        return Err(ModelError::NoSamples.into());
    }
    if !(t1.is_finite() && t2.is_finite()) || t1 < 0.0 || t1 > t2 {
        return Err(ModelError::InvalidTimeWindow { t1, t2 }.into());
    }
    let system = SplicingKinetics { rates: *rates };
    let solution = solve_dense(&system, 0.0, t2, start.to_array(), opts)?;
    tracing::trace!(t2, steps = solution.n_steps(), "integrated segment");

    let times = linspace(t1, t2, samples);
    let points = solution
        .eval_many(&times)
        .into_iter()
        .map(State::from_array)
        .collect();
    Ok(SampledTrajectory {
        points,
        end: State::from_array(solution.final_state()),
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_integrate.rs"]
mod tests;
