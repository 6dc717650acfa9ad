use std::fs;

use super::*;

const HEADER: &str = "gene_name\tstart_u\tstart_s\talpha\tbeta\tgamma\tstart_pct\tend_pct\tsamples\n";

fn parse_text(body: &str) -> Result<Vec<Regime>, InputError> {
    let text = format!("{HEADER}{body}");
    let reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(text.as_bytes());
    regimes_from_reader(reader, "inline")
}

#[test]
fn test_fresh_then_continue_rows() {
    let regimes = parse_text(
        "g1\t0\t0\t10\t10\t10\t0\t99\t50\n\
         g1\t\t\t0\t10\t10\t0\t90\t20\n\
         g1\tNone\tnone\t5\t10\t10\t10\t80\t5\n",
    )
    .unwrap();
    assert_eq!(regimes.len(), 3);
    assert_eq!(regimes[0].start, StartState::Fresh(State::ZERO));
    assert_eq!(regimes[1].start, StartState::Continue);
    assert_eq!(regimes[2].start, StartState::Continue);
    assert_eq!(regimes[1].rates, KineticParams::new(0.0, 10.0, 10.0));
    assert_eq!(regimes[2].window, PercentWindow::new(10.0, 80.0).unwrap());
    assert_eq!(regimes[0].samples, 50);
}

#[test]
fn test_first_row_without_start_is_rejected() {
    let err = parse_text("g1\t\t\t10\t10\t10\t0\t99\t50\n").unwrap_err();
    match err {
        InputError::Row { row, source, .. } => {
            assert_eq!(row, 1);
            assert_eq!(source, ModelError::MissingFirstStart);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_partial_start_is_rejected() {
    let err = parse_text("g1\t1.0\t\t10\t10\t10\t0\t99\t50\n").unwrap_err();
    assert!(matches!(err, InputError::InvalidInput(_)));
}

#[test]
fn test_bad_number_and_bad_window() {
    let err = parse_text("g1\tabc\t0\t10\t10\t10\t0\t99\t50\n").unwrap_err();
    assert!(matches!(err, InputError::Parse(_)));

    let err = parse_text("g1\t0\t0\t10\t10\t10\t50\t20\t50\n").unwrap_err();
    assert!(matches!(
        err,
        InputError::Row {
            source: ModelError::PercentOrder { .. },
            ..
        }
    ));
}

#[test]
fn test_zero_samples_rejected() {
    let err = parse_text("g1\t0\t0\t10\t10\t10\t0\t99\t0\n").unwrap_err();
    assert!(matches!(
        err,
        InputError::Row {
            source: ModelError::NoSamples,
            ..
        }
    ));
}

#[test]
fn test_empty_table_rejected() {
    assert!(matches!(parse_text(""), Err(InputError::InvalidInput(_))));
}

#[test]
fn test_parse_regimes_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regimes.csv");
    fs::write(
        &path,
        "gene_name,start_u,start_s,alpha,beta,gamma,start_pct,end_pct,samples\n\
         g1,0,0,10,10,10,0.1,99.9,100\n",
    )
    .unwrap();
    let regimes = parse_regimes(&path).unwrap();
    assert_eq!(regimes.len(), 1);
    assert_eq!(regimes[0].gene_name, "g1");
    assert_eq!(regimes[0].window, PercentWindow::FULL);
}
