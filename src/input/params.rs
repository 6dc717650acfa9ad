use std::path::Path;

use serde::Deserialize;

use crate::input::{InputError, open_maybe_gz};
use crate::model::params::SimParams;

/// Keys a parameter file may set. Absent keys leave the base profile alone.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamOverrides {
    dt: Option<f64>,
    noise_level: Option<f64>,
    rtol: Option<f64>,
    atol: Option<f64>,
    max_steps: Option<usize>,
}

impl ParamOverrides {
    fn apply(self, mut base: SimParams) -> SimParams {
        if let Some(dt) = self.dt {
            base.dt = dt;
        }
        if let Some(noise_level) = self.noise_level {
            base.noise_level = noise_level;
        }
        if let Some(rtol) = self.rtol {
            base.rtol = rtol;
        }
        if let Some(atol) = self.atol {
            base.atol = atol;
        }
        if let Some(max_steps) = self.max_steps {
            base.max_steps = max_steps;
        }
        base
    }
}

/// Reads a JSON parameter file and layers it over `base`.
pub fn load_params(path: &Path, base: SimParams) -> Result<SimParams, InputError> {
    let reader = open_maybe_gz(path)?;
    let overrides: ParamOverrides = serde_json::from_reader(reader)
        .map_err(|e| InputError::Parse(format!("{}: {e}", path.display())))?;
    let params = overrides.apply(base);
    params
        .validate()
        .map_err(|e| InputError::InvalidInput(format!("{}: {e}", path.display())))?;
    Ok(params)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/params.rs"]
mod tests;
