use rand::Rng;

use crate::model::ModelError;
use crate::model::kinetics::{KineticParams, State};
use crate::model::params::SimParams;
use crate::model::regime::{PercentWindow, Regime, StartState, validate_regimes};
use crate::model::topology::{PathSpec, PathTopology};
use crate::model::trajectory::TrajectoryTable;
use crate::pipeline::SimError;
use crate::pipeline::stage2_invert::TimeWindow;
use crate::pipeline::stage3_segment::{simulate, simulate_percent};
use crate::pipeline::stage4_noise::apply_noise;

/// One regime of a composed path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub rates: KineticParams,
    pub window: PercentWindow,
    pub samples: usize,
}

/// A regime table's composed path, returned with the regimes that built it.
#[derive(Debug, Clone)]
pub struct RegimePath {
    pub regimes: Vec<Regime>,
    pub table: TrajectoryTable,
}

impl RegimePath {
    /// Gene name of the regime behind each row, in row order.
    pub fn row_genes(&self) -> impl Iterator<Item = &str> + '_ {
        self.regimes
            .iter()
            .flat_map(|r| std::iter::repeat(r.gene_name.as_str()).take(r.samples))
    }
}

/// Per-cell schedule output: the path plus each cell's absolute time.
#[derive(Debug, Clone, Default)]
pub struct ScheduleTable {
    pub table: TrajectoryTable,
    pub t: Vec<f64>,
}

/// Runs `legs` back to back, each starting from the previous leg's end
/// state. Returns the concatenated table and the final state.
pub fn chain(
    start: State,
    legs: &[Leg],
    params: &SimParams,
) -> Result<(TrajectoryTable, State), SimError> {
    let total = legs.iter().map(|l| l.samples).sum();
    let mut table = TrajectoryTable::with_capacity(total);
    let mut state = start;
    for leg in legs {
        let segment = simulate_percent(state, &leg.rates, &leg.window, leg.samples, params)?;
        table.append(&segment.table);
        state = segment.end;
    }
    Ok((table, state))
}

/// Runs every leg from (0, 0), shifting leg k by `offsets[k]`.
pub fn independent(
    legs: &[Leg],
    offsets: &[State],
    params: &SimParams,
) -> Result<TrajectoryTable, SimError> {
    let total = legs.iter().map(|l| l.samples).sum();
    let mut table = TrajectoryTable::with_capacity(total);
    for (idx, leg) in legs.iter().enumerate() {
        let mut segment =
            simulate_percent(State::ZERO, &leg.rates, &leg.window, leg.samples, params)?;
        if let Some(&offset) = offsets.get(idx) {
            segment.table.shift(offset);
        }
        table.append(&segment.table);
    }
    Ok(table)
}

pub fn forward(
    rates: &KineticParams,
    samples: usize,
    params: &SimParams,
) -> Result<TrajectoryTable, SimError> {
    Ok(simulate_percent(State::ZERO, rates, &PercentWindow::FULL, samples, params)?.table)
}

/// Decay (alpha = 0) from the induction steady state of `rates`.
pub fn backward(
    rates: &KineticParams,
    samples: usize,
    params: &SimParams,
) -> Result<TrajectoryTable, SimError> {
    rates.validate()?;
    let decay = KineticParams {
        alpha: 0.0,
        ..*rates
    };
    let start = rates.steady_state();
    Ok(simulate_percent(start, &decay, &PercentWindow::FULL, samples, params)?.table)
}

fn legs_of(spec: &PathSpec) -> Result<[Leg; 2], SimError> {
    Ok([
        Leg {
            rates: spec.path1,
            window: PercentWindow::up_to(spec.path1_pct)?,
            samples: spec.path1_samples,
        },
        Leg {
            rates: spec.path2,
            window: PercentWindow::up_to(spec.path2_pct)?,
            samples: spec.path2_samples,
        },
    ])
}

/// Builds one gene's noiseless path for the given topology.
pub fn compose_path(spec: &PathSpec, params: &SimParams) -> Result<TrajectoryTable, SimError> {
    spec.validate()?;
    match spec.topology {
        PathTopology::Forward => forward(&spec.path1, spec.path1_samples, params),
        PathTopology::Backward => backward(&spec.path1, spec.path1_samples, params),
        PathTopology::TwoAlpha => {
            let legs = legs_of(spec)?;
            Ok(chain(State::ZERO, &legs, params)?.0)
        }
        PathTopology::Multipath => independent(&legs_of(spec)?, &[], params),
        PathTopology::FloatCircle => {
            let legs = legs_of(spec)?;
            let preroll = simulate_percent(
                State::ZERO,
                &spec.path2,
                &PercentWindow::up_to(PercentWindow::FULL.end_pct)?,
                spec.path2_samples,
                params,
            )?;
            Ok(chain(preroll.end, &legs, params)?.0)
        }
        PathTopology::Boost => {
            let offsets = [State::ZERO, spec.path1.steady_state()];
            independent(&legs_of(spec)?, &offsets, params)
        }
    }
}

/// Chains a regime table into one path and applies noise once at the end.
pub fn compose_regimes<R: Rng + ?Sized>(
    regimes: Vec<Regime>,
    params: &SimParams,
    rng: &mut R,
) -> Result<RegimePath, SimError> {
    validate_regimes(&regimes)?;
    let total = regimes.iter().map(|r| r.samples).sum();
    let mut table = TrajectoryTable::with_capacity(total);
    let mut last: Option<State> = None;
    for (row, regime) in regimes.iter().enumerate() {
        let start = match regime.start {
            StartState::Fresh(state) => state,
            StartState::Continue => last.ok_or(ModelError::MissingFirstStart)?,
        };
        let segment =
            simulate_percent(start, &regime.rates, &regime.window, regime.samples, params)?;
        tracing::debug!(
            row,
            gene = %regime.gene_name,
            u0 = start.u,
            s0 = start.s,
            t1 = segment.window.t1,
            t2 = segment.window.t2,
            "regime simulated"
        );
        table.append(&segment.table);
        last = Some(segment.end);
    }
    apply_noise(&mut table, params.noise_level, rng);
    Ok(RegimePath { regimes, table })
}

/// Integrates a per-cell rate schedule over `total_time`. Cell i advances
/// `total_time / n` from cell i-1's state and contributes one sample.
pub fn compose_schedule<R: Rng + ?Sized>(
    cells: &[KineticParams],
    total_time: f64,
    params: &SimParams,
    rng: &mut R,
) -> Result<ScheduleTable, SimError> {
    if cells.is_empty() {
        return Err(ModelError::NoSamples.into());
    }
    if !(total_time.is_finite() && total_time >= 0.0) {
        return Err(ModelError::InvalidTimeWindow {
            t1: 0.0,
            t2: total_time,
        }
        .into());
    }
    let ti = total_time / cells.len() as f64;
    let window = TimeWindow { t1: ti, t2: ti };

    let mut table = TrajectoryTable::with_capacity(cells.len());
    let mut state = State::ZERO;
    for rates in cells {
        let segment = simulate(state, rates, window, 1, params)?;
        table.append(&segment.table);
        state = segment.end;
    }
    apply_noise(&mut table, params.noise_level, rng);

    let t = (0..cells.len()).map(|i| ti * (i + 1) as f64).collect();
    Ok(ScheduleTable { table, t })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_compose.rs"]
mod tests;
