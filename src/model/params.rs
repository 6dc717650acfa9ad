use serde::Serialize;

use crate::model::ModelError;
use crate::solver::SolverOptions;

/// Numerical knobs shared by every segment of a run.
///
/// `dt` is the fixed Euler step behind the (u1, s1) look-ahead columns. It is
/// independent of the adaptive integrator's own step sizes and exists as a
/// finite-difference label for downstream velocity methods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimParams {
    pub dt: f64,
    pub noise_level: f64,
    pub rtol: f64,
    pub atol: f64,
    pub max_steps: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamProfile {
    Default,
    Precise,
}

impl SimParams {
    pub fn default_v1() -> Self {
        Self {
            dt: 0.001,
            noise_level: 0.2,
            rtol: 1e-3,
            atol: 1e-6,
            max_steps: 1_000_000,
        }
    }

    pub fn precise_v1() -> Self {
        let mut base = Self::default_v1();
        base.rtol = 1e-8;
        base.atol = 1e-10;
        base
    }

    pub fn from_profile(profile: ParamProfile) -> Self {
        match profile {
            ParamProfile::Default => Self::default_v1(),
            ParamProfile::Precise => Self::precise_v1(),
        }
    }

    pub fn with_noise(mut self, noise_level: f64) -> Self {
        self.noise_level = noise_level;
        self
    }

    pub fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            rtol: self.rtol,
            atol: self.atol,
            max_steps: self.max_steps,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.dt.is_finite() || self.dt < 0.0 {
            return Err(ModelError::InvalidParam {
                name: "dt",
                reason: "must be finite and non-negative",
            });
        }
        if !self.noise_level.is_finite() || self.noise_level < 0.0 {
            return Err(ModelError::InvalidParam {
                name: "noise_level",
                reason: "must be finite and non-negative",
            });
        }
        if !(self.rtol > 0.0) || !(self.atol > 0.0) {
            return Err(ModelError::InvalidParam {
                name: "rtol/atol",
                reason: "tolerances must be positive",
            });
        }
        if self.max_steps == 0 {
            return Err(ModelError::InvalidParam {
                name: "max_steps",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

impl Default for SimParams {
    fn default() -> Self {
        Self::default_v1()
    }
}
