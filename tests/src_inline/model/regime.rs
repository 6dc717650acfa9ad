use super::*;

fn regime(start: StartState) -> Regime {
    Regime {
        gene_name: "g1".to_string(),
        start,
        rates: KineticParams::new(15.0, 10.0, 12.0),
        window: PercentWindow::new(0.0, 99.0).unwrap(),
        samples: 10,
    }
}

#[test]
fn test_percent_window_bounds() {
    assert!(PercentWindow::new(0.0, 100.0).is_ok());
    assert!(matches!(
        PercentWindow::new(-1.0, 50.0),
        Err(ModelError::PercentOutOfRange { .. })
    ));
    assert!(matches!(
        PercentWindow::new(10.0, 100.5),
        Err(ModelError::PercentOutOfRange { .. })
    ));
    assert!(matches!(
        PercentWindow::new(60.0, 50.0),
        Err(ModelError::PercentOrder { .. })
    ));
    assert!(PercentWindow::new(f64::NAN, 50.0).is_err());
}

#[test]
fn test_first_regime_needs_start() {
    let regimes = vec![regime(StartState::Continue)];
    assert_eq!(
        validate_regimes(&regimes),
        Err(ModelError::MissingFirstStart)
    );
}

#[test]
fn test_continue_after_fresh_is_valid() {
    let regimes = vec![
        regime(StartState::Fresh(State::ZERO)),
        regime(StartState::Continue),
    ];
    assert!(validate_regimes(&regimes).is_ok());
    assert!(validate_regimes(&[]).is_ok());
}

#[test]
fn test_zero_samples_rejected() {
    let mut r = regime(StartState::Fresh(State::ZERO));
    r.samples = 0;
    assert_eq!(r.validate(), Err(ModelError::NoSamples));
}
