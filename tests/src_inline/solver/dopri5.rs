use super::*;

struct Decay {
    k: f64,
}

impl OdeSystem<1> for Decay {
    fn derivative(&self, _t: f64, y: &[f64; 1], dy: &mut [f64; 1]) {
        dy[0] = -self.k * y[0];
    }
}

struct Oscillator;

impl OdeSystem<2> for Oscillator {
    fn derivative(&self, _t: f64, y: &[f64; 2], dy: &mut [f64; 2]) {
        dy[0] = y[1];
        dy[1] = -y[0];
    }
}

struct Blowup;

impl OdeSystem<1> for Blowup {
    fn derivative(&self, t: f64, _y: &[f64; 1], dy: &mut [f64; 1]) {
        dy[0] = 1.0 / (1.0 - t);
    }
}

fn tight() -> SolverOptions {
    SolverOptions {
        rtol: 1e-9,
        atol: 1e-12,
        ..SolverOptions::default()
    }
}

#[test]
fn test_exponential_decay_matches_closed_form() {
    let sol = solve_dense(&Decay { k: 1.0 }, 0.0, 5.0, [1.0], &tight()).unwrap();
    assert!((sol.final_state()[0] - (-5.0f64).exp()).abs() < 1e-8);
    for t in [0.0, 0.7, 1.3, 2.5, 4.9] {
        let y = sol.eval(t)[0];
        assert!((y - (-t).exp()).abs() < 1e-7, "t={t} y={y}");
    }
}

#[test]
fn test_default_tolerances_stay_close() {
    let sol = solve_dense(&Decay { k: 1.0 }, 0.0, 5.0, [1.0], &SolverOptions::default()).unwrap();
    let end = sol.final_state()[0];
    assert!((end - (-5.0f64).exp()).abs() < 1e-3);
    assert!(sol.n_steps() > 1);
}

#[test]
fn test_backward_direction() {
    let y0 = (-5.0f64).exp();
    let sol = solve_dense(&Decay { k: 1.0 }, 5.0, 0.0, [y0], &tight()).unwrap();
    assert!((sol.final_state()[0] - 1.0).abs() < 1e-7);
    assert!((sol.eval(2.5)[0] - (-2.5f64).exp()).abs() < 1e-7);
    assert_eq!(sol.eval(5.0), [y0]);
}

#[test]
fn test_two_dimensional_system() {
    let sol = solve_dense(&Oscillator, 0.0, 3.0, [0.0, 1.0], &tight()).unwrap();
    let y = sol.eval(1.0);
    assert!((y[0] - 1.0f64.sin()).abs() < 1e-7);
    assert!((y[1] - 1.0f64.cos()).abs() < 1e-7);
}

#[test]
fn test_zero_length_span() {
    let sol = solve_dense(&Decay { k: 1.0 }, 2.0, 2.0, [3.0], &tight()).unwrap();
    assert_eq!(sol.n_steps(), 0);
    assert_eq!(sol.final_state(), [3.0]);
}

#[test]
fn test_singular_rhs_fails() {
    let err = solve_dense(&Blowup, 0.0, 1.0, [0.0], &SolverOptions::default());
    assert!(err.is_err());
}

#[test]
fn test_step_budget() {
    let opts = SolverOptions {
        rtol: 1e-12,
        atol: 1e-14,
        max_steps: 3,
    };
    let err = solve_dense(&Decay { k: 1.0 }, 0.0, 50.0, [1.0], &opts).unwrap_err();
    assert!(matches!(err, SolverError::MaxStepsExceeded { max_steps: 3, .. }));
}

#[test]
fn test_non_finite_bounds_rejected() {
    let err = solve_dense(&Decay { k: 1.0 }, 0.0, f64::INFINITY, [1.0], &tight()).unwrap_err();
    assert!(matches!(err, SolverError::InvalidSpan { .. }));
}
