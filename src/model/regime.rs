use crate::model::ModelError;
use crate::model::kinetics::{KineticParams, State};

/// Progress window along a regime's saturation curve, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentWindow {
    pub start_pct: f64,
    pub end_pct: f64,
}

impl PercentWindow {
    /// 0.1 % to 99.9 %, the window used by single-regime presets.
    pub const FULL: PercentWindow = PercentWindow {
        start_pct: 0.1,
        end_pct: 99.9,
    };

    pub fn new(start_pct: f64, end_pct: f64) -> Result<Self, ModelError> {
        for value in [start_pct, end_pct] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ModelError::PercentOutOfRange { value });
            }
        }
        if start_pct > end_pct {
            return Err(ModelError::PercentOrder { start_pct, end_pct });
        }
        Ok(Self { start_pct, end_pct })
    }

    pub fn up_to(end_pct: f64) -> Result<Self, ModelError> {
        Self::new(0.0, end_pct)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartState {
    Fresh(State),
    Continue,
}

/// One row of a regime table.
#[derive(Debug, Clone, PartialEq)]
pub struct Regime {
    pub gene_name: String,
    pub start: StartState,
    pub rates: KineticParams,
    pub window: PercentWindow,
    pub samples: usize,
}

impl Regime {
    pub fn validate(&self) -> Result<(), ModelError> {
        self.rates.validate()?;
        if let StartState::Fresh(state) = self.start {
            state.validate()?;
        }
        if self.samples == 0 {
            return Err(ModelError::NoSamples);
        }
        Ok(())
    }
}

/// Checks a whole regime sequence; the first row has nothing to continue from.
pub fn validate_regimes(regimes: &[Regime]) -> Result<(), ModelError> {
    if let Some(first) = regimes.first() {
        if first.start == StartState::Continue {
            return Err(ModelError::MissingFirstStart);
        }
    }
    for regime in regimes {
        regime.validate()?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/regime.rs"]
mod tests;
