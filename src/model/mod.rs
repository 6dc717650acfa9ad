pub mod kinetics;
pub mod params;
pub mod regime;
pub mod topology;
pub mod trajectory;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid rates (alpha={alpha}, beta={beta}, gamma={gamma}): {reason}")]
    InvalidRates {
        alpha: f64,
        beta: f64,
        gamma: f64,
        reason: &'static str,
    },
    #[error("percentage {value} is outside [0, 100]")]
    PercentOutOfRange { value: f64 },
    #[error("end percentage {end_pct} is not reachable from start percentage {start_pct}")]
    PercentOrder { start_pct: f64, end_pct: f64 },
    #[error("sample count must be at least 1")]
    NoSamples,
    #[error("invalid time window [{t1}, {t2}]")]
    InvalidTimeWindow { t1: f64, t2: f64 },
    #[error("invalid start state (u={u}, s={s})")]
    InvalidStart { u: f64, s: f64 },
    #[error("start_u and start_s must be given on the first regime row")]
    MissingFirstStart,
    #[error("invalid parameter {name}: {reason}")]
    InvalidParam {
        name: &'static str,
        reason: &'static str,
    },
}
