use crate::model::kinetics::{KineticParams, State};
use crate::model::params::SimParams;
use crate::model::regime::PercentWindow;
use crate::model::trajectory::TrajectoryTable;
use crate::pipeline::SimError;
use crate::pipeline::stage1_integrate::generate_points;
use crate::pipeline::stage2_invert::{TimeWindow, invert_window};

/// One regime's sampled trajectory plus the state reached at `window.t2`.
/// `end` is the integrator's state at `t2` even when the last sample sits
/// earlier (a single sample is taken at `t1`).
#[derive(Debug, Clone)]
pub struct Segment {
    pub table: TrajectoryTable,
    pub end: State,
    pub window: TimeWindow,
}

/// Simulates one regime over an explicit time window.
pub fn simulate(
    start: State,
    rates: &KineticParams,
    window: TimeWindow,
    samples: usize,
    params: &SimParams,
) -> Result<Segment, SimError> {
    rates.validate()?;
    let sampled = generate_points(
        start,
        rates,
        window.t1,
        window.t2,
        samples,
        &params.solver_options(),
    )?;

    let mut table = TrajectoryTable::with_capacity(sampled.points.len());
    for &point in &sampled.points {
        table.push_row(point, rates.euler_step(point, params.dt), rates);
    }

    Ok(Segment {
        table,
        end: sampled.end,
        window,
    })
}

/// Simulates one regime between two milestones of its saturation curve.
pub fn simulate_percent(
    start: State,
    rates: &KineticParams,
    window: &PercentWindow,
    samples: usize,
    params: &SimParams,
) -> Result<Segment, SimError> {
    let times = invert_window(start.u, rates, window, &params.solver_options())?;
    tracing::debug!(
        alpha = rates.alpha,
        beta = rates.beta,
        gamma = rates.gamma,
        start_pct = window.start_pct,
        end_pct = window.end_pct,
        t1 = times.t1,
        t2 = times.t2,
        "percentage window inverted"
    );
    simulate(start, rates, times, samples, params)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_segment.rs"]
mod tests;
