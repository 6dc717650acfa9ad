use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

use crate::model::kinetics::{KineticParams, State};

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[test]
fn test_noise_sd_from_p99() {
    let values: Vec<f64> = (0..=100).map(f64::from).collect();
    assert!((noise_sd(&values, 0.2) - 0.2 * 99.0 / 10.0).abs() < 1e-12);
    assert_eq!(noise_sd(&[], 0.2), 0.0);
}

#[test]
fn test_noise_is_zero_mean() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut u = vec![10.0; 20_000];
    let mut s = vec![20.0; 20_000];
    jitter(&mut u, &mut s, 0.2, &mut rng);

    assert!((mean(&u) - 10.0).abs() < 0.01);
    assert!((mean(&s) - 20.0).abs() < 0.02);
    let var_u = u.iter().map(|v| (v - 10.0).powi(2)).sum::<f64>() / u.len() as f64;
    assert!((var_u.sqrt() - 0.2).abs() < 0.01);
}

#[test]
fn test_noise_output_is_non_negative() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut u: Vec<f64> = (0..1000).map(|i| (i % 10) as f64 * 0.01).collect();
    let mut s = u.clone();
    jitter(&mut u, &mut s, 5.0, &mut rng);
    assert!(u.iter().chain(s.iter()).all(|&v| v >= 0.0));
    assert!(u.iter().any(|&v| v == 0.0));
}

#[test]
fn test_degenerate_noise_is_identity() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut u = vec![1.0, 2.0, 3.0];
    let mut s = vec![0.5, 0.5, 0.5];
    jitter(&mut u, &mut s, 0.0, &mut rng);
    assert_eq!(u, vec![1.0, 2.0, 3.0]);
    assert_eq!(s, vec![0.5, 0.5, 0.5]);

    let mut zeros_u = vec![0.0; 5];
    let mut zeros_s = vec![0.0; 5];
    jitter(&mut zeros_u, &mut zeros_s, 0.5, &mut rng);
    assert_eq!(zeros_u, vec![0.0; 5]);
    assert_eq!(zeros_s, vec![0.0; 5]);
}

#[test]
fn test_same_seed_same_noise() {
    let base_u = vec![1.0, 2.0, 3.0, 4.0];
    let base_s = vec![4.0, 3.0, 2.0, 1.0];
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let (mut u, mut s) = (base_u.clone(), base_s.clone());
        jitter(&mut u, &mut s, 0.2, &mut rng);
        (u, s)
    };
    assert_eq!(run(11), run(11));
    assert_ne!(run(11), run(12));
}

#[test]
fn test_apply_noise_leaves_look_ahead_untouched() {
    let rates = KineticParams::new(1.0, 1.0, 1.0);
    let mut table = TrajectoryTable::default();
    for i in 1..=50 {
        let state = State::new(i as f64, 2.0 * i as f64);
        table.push_row(state, rates.euler_step(state, 0.001), &rates);
    }
    let before = table.clone();
    let mut rng = StdRng::seed_from_u64(5);
    apply_noise(&mut table, 0.2, &mut rng);

    assert_eq!(table.u1, before.u1);
    assert_eq!(table.s1, before.s1);
    assert_eq!(table.alpha, before.alpha);
    assert_ne!(table.u0, before.u0);
    assert_ne!(table.s0, before.s0);
}
