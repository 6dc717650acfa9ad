use serde::{Deserialize, Serialize};

use crate::model::ModelError;
use crate::solver::OdeSystem;

/// Transcription (alpha), splicing (beta) and degradation (gamma) rates of
/// one regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KineticParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// Unspliced (u) and spliced (s) abundance.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    pub u: f64,
    pub s: f64,
}

impl State {
    pub const ZERO: State = State { u: 0.0, s: 0.0 };

    pub fn new(u: f64, s: f64) -> Self {
        Self { u, s }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.u.is_finite() || !self.s.is_finite() || self.u < 0.0 || self.s < 0.0 {
            return Err(ModelError::InvalidStart {
                u: self.u,
                s: self.s,
            });
        }
        Ok(())
    }

    pub(crate) fn to_array(self) -> [f64; 2] {
        [self.u, self.s]
    }

    pub(crate) fn from_array(y: [f64; 2]) -> Self {
        Self { u: y[0], s: y[1] }
    }
}

impl KineticParams {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { alpha, beta, gamma }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let fail = |reason| ModelError::InvalidRates {
            alpha: self.alpha,
            beta: self.beta,
            gamma: self.gamma,
            reason,
        };
        if !(self.alpha.is_finite() && self.beta.is_finite() && self.gamma.is_finite()) {
            return Err(fail("rates must be finite"));
        }
        if self.alpha < 0.0 {
            return Err(fail("alpha must be non-negative"));
        }
        if self.beta <= 0.0 {
            return Err(fail("beta must be positive"));
        }
        if self.gamma <= 0.0 {
            return Err(fail("gamma must be positive"));
        }
        Ok(())
    }

    /// Fixed point (alpha/beta, alpha/gamma).
    pub fn steady_state(&self) -> State {
        State {
            u: self.alpha / self.beta,
            s: self.alpha / self.gamma,
        }
    }

    pub fn velocity(&self, state: State) -> State {
        State {
            u: self.alpha - self.beta * state.u,
            s: self.beta * state.u - self.gamma * state.s,
        }
    }

    /// One explicit Euler step of size `dt`.
    pub fn euler_step(&self, state: State, dt: f64) -> State {
        let v = self.velocity(state);
        State {
            u: state.u + v.u * dt,
            s: state.s + v.s * dt,
        }
    }
}

/// `du/dt = alpha - beta*u`, `ds/dt = beta*u - gamma*s` with `y = [u, s]`.
#[derive(Debug, Clone, Copy)]
pub struct SplicingKinetics {
    pub rates: KineticParams,
}

impl OdeSystem<2> for SplicingKinetics {
    fn derivative(&self, _t: f64, y: &[f64; 2], dy: &mut [f64; 2]) {
        let v = self.rates.velocity(State::from_array(*y));
        dy[0] = v.u;
        dy[1] = v.s;
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/kinetics.rs"]
mod tests;
