//! Dormand–Prince 5(4) with the free quartic continuous extension.
//!
//! Step control follows the classic embedded-pair scheme: RMS error norm
//! scaled by `atol + max(|y|, |y_new|) * rtol`, safety factor 0.9 and the
//! step multiplier bounded to [0.2, 10].

use super::{DenseSolution, DenseStep, OdeSystem, SolverError, SolverOptions};

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;
const ERROR_EXPONENT: f64 = -1.0 / 5.0;
const STAGES: usize = 6;

const C: [f64; STAGES] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0];

const A: [[f64; 5]; STAGES] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
    ],
];

const B: [f64; STAGES] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];

const E: [f64; STAGES + 1] = [
    -71.0 / 57600.0,
    0.0,
    71.0 / 16695.0,
    -71.0 / 1920.0,
    17253.0 / 339200.0,
    -22.0 / 525.0,
    1.0 / 40.0,
];

const P: [[f64; 4]; STAGES + 1] = [
    [
        1.0,
        -8048581381.0 / 2820520608.0,
        8663915743.0 / 2820520608.0,
        -12715105075.0 / 11282082432.0,
    ],
    [0.0, 0.0, 0.0, 0.0],
    [
        0.0,
        131558114200.0 / 32700410799.0,
        -68118460800.0 / 10900136933.0,
        87487479700.0 / 32700410799.0,
    ],
    [
        0.0,
        -1754552775.0 / 470086768.0,
        14199869525.0 / 1410260304.0,
        -10690763975.0 / 1880347072.0,
    ],
    [
        0.0,
        127303824393.0 / 49829197408.0,
        -318862633887.0 / 49829197408.0,
        701980252875.0 / 199316789632.0,
    ],
    [
        0.0,
        -282668133.0 / 205662961.0,
        2019193451.0 / 616988883.0,
        -1453857185.0 / 822651844.0,
    ],
    [
        0.0,
        40617522.0 / 29380423.0,
        -110615467.0 / 29380423.0,
        69997945.0 / 29380423.0,
    ],
];

fn rms_norm<const N: usize>(v: &[f64; N]) -> f64 {
    if N == 0 {
        return 0.0;
    }
    let sum: f64 = v.iter().map(|x| x * x).sum();
    (sum / N as f64).sqrt()
}

fn eval_rhs<S, const N: usize>(system: &S, t: f64, y: &[f64; N]) -> [f64; N]
where
    S: OdeSystem<N> + ?Sized,
{
    let mut dy = [0.0; N];
    system.derivative(t, y, &mut dy);
    dy
}

fn initial_step<S, const N: usize>(
    system: &S,
    t0: f64,
    y0: &[f64; N],
    f0: &[f64; N],
    direction: f64,
    interval: f64,
    opts: &SolverOptions,
) -> f64
where
    S: OdeSystem<N> + ?Sized,
{
    let mut scale = [0.0; N];
    for i in 0..N {
        scale[i] = opts.atol + y0[i].abs() * opts.rtol;
    }
    let mut scaled_y = [0.0; N];
    let mut scaled_f = [0.0; N];
    for i in 0..N {
        scaled_y[i] = y0[i] / scale[i];
        scaled_f[i] = f0[i] / scale[i];
    }
    let d0 = rms_norm(&scaled_y);
    let d1 = rms_norm(&scaled_f);

    let mut h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };
    h0 = h0.min(interval);

    let mut y1 = [0.0; N];
    for i in 0..N {
        y1[i] = y0[i] + h0 * direction * f0[i];
    }
    let f1 = eval_rhs(system, t0 + h0 * direction, &y1);
    let mut diff = [0.0; N];
    for i in 0..N {
        diff[i] = (f1[i] - f0[i]) / scale[i];
    }
    let d2 = rms_norm(&diff) / h0;

    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(1.0 / 5.0)
    };
    (100.0 * h0).min(h1).min(interval)
}

/// Integrates `system` from `t0` to `t_bound` (either direction) and keeps
/// every accepted step's interpolant.
pub fn solve_dense<S, const N: usize>(
    system: &S,
    t0: f64,
    t_bound: f64,
    y0: [f64; N],
    opts: &SolverOptions,
) -> Result<DenseSolution<N>, SolverError>
where
    S: OdeSystem<N> + ?Sized,
{
    if !t0.is_finite() || !t_bound.is_finite() {
        return Err(SolverError::InvalidSpan { t0, t_bound });
    }
    let interval = (t_bound - t0).abs();
    if interval == 0.0 {
        return Ok(DenseSolution::new(t0, t_bound, y0, y0, Vec::new()));
    }
    let direction = if t_bound > t0 { 1.0 } else { -1.0 };

    let mut t = t0;
    let mut y = y0;
    let mut f = eval_rhs(system, t, &y);
    if f.iter().any(|v| !v.is_finite()) {
        return Err(SolverError::NonFiniteDerivative { t });
    }
    let mut h_abs = initial_step(system, t0, &y0, &f, direction, interval, opts);

    let mut k = [[0.0; N]; STAGES + 1];
    let mut steps: Vec<DenseStep<N>> = Vec::new();

    while direction * (t - t_bound) < 0.0 {
        if steps.len() >= opts.max_steps {
            return Err(SolverError::MaxStepsExceeded {
                max_steps: opts.max_steps,
                t,
            });
        }

        let next = if direction > 0.0 { t.next_up() } else { t.next_down() };
        let min_step = 10.0 * (next - t).abs();
        if h_abs < min_step {
            h_abs = min_step;
        }

        let mut rejected = false;
        let (t_new, y_new, f_new) = loop {
            if h_abs < min_step {
                return Err(SolverError::StepSizeTooSmall { t });
            }
            let mut t_new = t + h_abs * direction;
            if direction * (t_new - t_bound) > 0.0 {
                t_new = t_bound;
            }
            let h = t_new - t;
            h_abs = h.abs();

            k[0] = f;
            for s in 1..STAGES {
                let mut ys = y;
                for i in 0..N {
                    let mut dy = 0.0;
                    for j in 0..s {
                        dy += k[j][i] * A[s][j];
                    }
                    ys[i] += dy * h;
                }
                k[s] = eval_rhs(system, t + C[s] * h, &ys);
            }
            let mut y_new = y;
            for i in 0..N {
                let mut acc = 0.0;
                for s in 0..STAGES {
                    acc += k[s][i] * B[s];
                }
                y_new[i] += h * acc;
            }
            let f_new = eval_rhs(system, t + h, &y_new);
            k[STAGES] = f_new;

            let mut err = [0.0; N];
            for i in 0..N {
                let mut acc = 0.0;
                for s in 0..=STAGES {
                    acc += k[s][i] * E[s];
                }
                let scale = opts.atol + y[i].abs().max(y_new[i].abs()) * opts.rtol;
                err[i] = acc * h / scale;
            }
            let error_norm = rms_norm(&err);

            if error_norm < 1.0 {
                let mut factor = if error_norm == 0.0 {
                    MAX_FACTOR
                } else {
                    MAX_FACTOR.min(SAFETY * error_norm.powf(ERROR_EXPONENT))
                };
                if rejected {
                    factor = factor.min(1.0);
                }
                h_abs *= factor;
                break (t_new, y_new, f_new);
            }
            // NaN norms land here too; `max` then falls back to MIN_FACTOR.
            h_abs *= MIN_FACTOR.max(SAFETY * error_norm.powf(ERROR_EXPONENT));
            rejected = true;
        };

        let mut q = [[0.0; 4]; N];
        for i in 0..N {
            for j in 0..4 {
                let mut acc = 0.0;
                for s in 0..=STAGES {
                    acc += k[s][i] * P[s][j];
                }
                q[i][j] = acc;
            }
        }
        steps.push(DenseStep {
            t_old: t,
            t_new,
            y_old: y,
            q,
        });

        t = t_new;
        y = y_new;
        f = f_new;
    }

    Ok(DenseSolution::new(t0, t_bound, y0, y, steps))
}

#[cfg(test)]
#[path = "../../tests/src_inline/solver/dopri5.rs"]
mod tests;
