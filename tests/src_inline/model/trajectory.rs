use super::*;

fn table(rows: &[(f64, f64)]) -> TrajectoryTable {
    let rates = KineticParams::new(1.0, 2.0, 3.0);
    let mut t = TrajectoryTable::with_capacity(rows.len());
    for &(u, s) in rows {
        let state = State::new(u, s);
        t.push_row(state, rates.euler_step(state, 0.1), &rates);
    }
    t
}

#[test]
fn test_append_keeps_row_order() {
    let mut a = table(&[(0.0, 0.0), (1.0, 1.0)]);
    let b = table(&[(2.0, 3.0)]);
    a.append(&b);
    assert_eq!(a.len(), 3);
    assert_eq!(a.last_state(), Some(State::new(2.0, 3.0)));
    assert_eq!(a.first_state(), Some(State::ZERO));
}

#[test]
fn test_shift_moves_current_and_lookahead() {
    let mut t = table(&[(0.0, 0.0)]);
    let u1 = t.u1[0];
    let s1 = t.s1[0];
    t.shift(State::new(0.5, 2.0));
    assert_eq!(t.u0[0], 0.5);
    assert_eq!(t.s0[0], 2.0);
    assert!((t.u1[0] - (u1 + 0.5)).abs() < 1e-12);
    assert!((t.s1[0] - (s1 + 2.0)).abs() < 1e-12);
    assert_eq!(t.alpha[0], 1.0);
}

#[test]
fn test_truncate_and_empty() {
    let mut t = table(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
    t.truncate(2);
    assert_eq!(t.len(), 2);
    assert_eq!(t.gamma.len(), 2);
    t.truncate(0);
    assert!(t.is_empty());
    assert_eq!(t.last_state(), None);
}
