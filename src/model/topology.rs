use crate::model::ModelError;
use crate::model::kinetics::KineticParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathTopology {
    /// Single induction from zero.
    Forward,
    /// Pure decay from the induction steady state.
    Backward,
    /// Induction with regime 1, then regime 2 chained from its end state.
    TwoAlpha,
    /// Two independent inductions from zero, concatenated.
    Multipath,
    /// Regime 2 run to saturation and discarded, then regime 1 and regime 2
    /// chained from that level.
    FloatCircle,
    /// Two inductions from zero, the second shifted by regime 1's steady state.
    Boost,
}

impl PathTopology {
    pub fn name(self) -> &'static str {
        match self {
            PathTopology::Forward => "forward",
            PathTopology::Backward => "backward",
            PathTopology::TwoAlpha => "two_alpha",
            PathTopology::Multipath => "multipath",
            PathTopology::FloatCircle => "float_circle",
            PathTopology::Boost => "boost",
        }
    }

    pub fn uses_second_path(self) -> bool {
        !matches!(self, PathTopology::Forward | PathTopology::Backward)
    }
}

/// Per-gene path specification shared by every simulated gene.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSpec {
    pub topology: PathTopology,
    pub path1: KineticParams,
    pub path2: KineticParams,
    pub path1_pct: f64,
    pub path2_pct: f64,
    pub path1_samples: usize,
    pub path2_samples: usize,
}

impl PathSpec {
    pub fn single(topology: PathTopology, rates: KineticParams, samples: usize) -> Self {
        Self {
            topology,
            path1: rates,
            path2: KineticParams::new(0.0, 0.0, 0.0),
            path1_pct: 0.0,
            path2_pct: 0.0,
            path1_samples: samples,
            path2_samples: 0,
        }
    }

    /// Rows one gene contributes to the cell axis.
    pub fn cell_count(&self) -> usize {
        if self.topology.uses_second_path() {
            self.path1_samples + self.path2_samples
        } else {
            self.path1_samples
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        self.path1.validate()?;
        if self.path1_samples == 0 {
            return Err(ModelError::NoSamples);
        }
        if self.topology.uses_second_path() {
            self.path2.validate()?;
            if self.path2_samples == 0 {
                return Err(ModelError::NoSamples);
            }
            for value in [self.path1_pct, self.path2_pct] {
                if !(0.0..=100.0).contains(&value) {
                    return Err(ModelError::PercentOutOfRange { value });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/topology.rs"]
mod tests;
