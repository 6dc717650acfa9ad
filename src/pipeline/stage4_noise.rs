use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::model::trajectory::TrajectoryTable;
use crate::report::percentile_linear;

/// Noise standard deviation for one variable: `scale * p99 / 10`.
pub fn noise_sd(values: &[f64], scale: f64) -> f64 {
    scale * percentile_linear(values, 99.0) / 10.0
}

fn add_gaussian<R: Rng + ?Sized>(values: &mut [f64], sd: f64, rng: &mut R) {
    // A zero or negative spread (all-zero trajectory, zero scale) adds nothing.
    if !(sd.is_finite() && sd > 0.0) {
        return;
    }
    let Ok(normal) = Normal::new(0.0, sd) else {
        return;
    };
    for v in values.iter_mut() {
        *v += normal.sample(rng);
    }
}

fn clip_non_negative(values: &mut [f64]) {
    for v in values.iter_mut() {
        if *v < 0.0 {
            *v = 0.0;
        }
    }
}

/// Adds abundance-scaled Gaussian noise to u and s and clips both at zero.
/// Spreads are computed from the noiseless values; s is drawn before u.
pub fn jitter<R: Rng + ?Sized>(u: &mut [f64], s: &mut [f64], scale: f64, rng: &mut R) {
    let sd_s = noise_sd(s, scale);
    let sd_u = noise_sd(u, scale);
    add_gaussian(s, sd_s, rng);
    add_gaussian(u, sd_u, rng);
    clip_non_negative(u);
    clip_non_negative(s);
}

/// Perturbs a finished path's sampled abundances in place. The look-ahead
/// columns stay noiseless.
pub fn apply_noise<R: Rng + ?Sized>(table: &mut TrajectoryTable, scale: f64, rng: &mut R) {
    jitter(&mut table.u0, &mut table.s0, scale, rng);
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_noise.rs"]
mod tests;
