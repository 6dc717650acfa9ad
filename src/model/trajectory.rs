use crate::model::kinetics::{KineticParams, State};

/// Columnar table of sampled points, one row per simulated cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectoryTable {
    pub u0: Vec<f64>,
    pub s0: Vec<f64>,
    pub u1: Vec<f64>,
    pub s1: Vec<f64>,
    pub alpha: Vec<f64>,
    pub beta: Vec<f64>,
    pub gamma: Vec<f64>,
}

impl TrajectoryTable {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            u0: Vec::with_capacity(n),
            s0: Vec::with_capacity(n),
            u1: Vec::with_capacity(n),
            s1: Vec::with_capacity(n),
            alpha: Vec::with_capacity(n),
            beta: Vec::with_capacity(n),
            gamma: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.u0.len()
    }

    pub fn push_row(&mut self, current: State, next: State, rates: &KineticParams) {
        self.u0.push(current.u);
        self.s0.push(current.s);
        self.u1.push(next.u);
        self.s1.push(next.s);
        self.alpha.push(rates.alpha);
        self.beta.push(rates.beta);
        self.gamma.push(rates.gamma);
    }

    pub fn append(&mut self, other: &TrajectoryTable) {
        self.u0.extend_from_slice(&other.u0);
        self.s0.extend_from_slice(&other.s0);
        self.u1.extend_from_slice(&other.u1);
        self.s1.extend_from_slice(&other.s1);
        self.alpha.extend_from_slice(&other.alpha);
        self.beta.extend_from_slice(&other.beta);
        self.gamma.extend_from_slice(&other.gamma);
    }

    /// Adds a constant offset to the current and look-ahead abundances.
    pub fn shift(&mut self, offset: State) {
        for v in self.u0.iter_mut().chain(self.u1.iter_mut()) {
            *v += offset.u;
        }
        for v in self.s0.iter_mut().chain(self.s1.iter_mut()) {
            *v += offset.s;
        }
    }

    pub fn truncate(&mut self, n: usize) {
        self.u0.truncate(n);
        self.s0.truncate(n);
        self.u1.truncate(n);
        self.s1.truncate(n);
        self.alpha.truncate(n);
        self.beta.truncate(n);
        self.gamma.truncate(n);
    }
}

#[cfg(test)]
impl TrajectoryTable {
    pub fn is_empty(&self) -> bool {
        self.u0.is_empty()
    }

    pub fn state(&self, row: usize) -> Option<State> {
        Some(State::new(*self.u0.get(row)?, *self.s0.get(row)?))
    }

    pub fn first_state(&self) -> Option<State> {
        self.state(0)
    }

    pub fn last_state(&self) -> Option<State> {
        self.len().checked_sub(1).and_then(|row| self.state(row))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/trajectory.rs"]
mod tests;
