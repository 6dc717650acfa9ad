use super::*;

fn two_path(topology: PathTopology) -> PathSpec {
    PathSpec {
        topology,
        path1: KineticParams::new(2.0, 1.0, 1.0),
        path2: KineticParams::new(0.0, 1.0, 1.0),
        path1_pct: 99.0,
        path2_pct: 99.0,
        path1_samples: 30,
        path2_samples: 20,
    }
}

#[test]
fn test_cell_count_per_topology() {
    assert_eq!(two_path(PathTopology::TwoAlpha).cell_count(), 50);
    assert_eq!(two_path(PathTopology::Boost).cell_count(), 50);
    let single = PathSpec::single(PathTopology::Forward, KineticParams::new(1.0, 1.0, 1.0), 40);
    assert_eq!(single.cell_count(), 40);
}

#[test]
fn test_single_path_ignores_second_regime() {
    let single = PathSpec::single(PathTopology::Backward, KineticParams::new(1.0, 1.0, 1.0), 5);
    assert!(single.validate().is_ok());
}

#[test]
fn test_two_path_validation() {
    assert!(two_path(PathTopology::Multipath).validate().is_ok());
    let mut bad = two_path(PathTopology::Multipath);
    bad.path2_pct = 120.0;
    assert!(bad.validate().is_err());
    let mut bad = two_path(PathTopology::FloatCircle);
    bad.path2_samples = 0;
    assert_eq!(bad.validate(), Err(ModelError::NoSamples));
}

#[test]
fn test_topology_names() {
    assert_eq!(PathTopology::FloatCircle.name(), "float_circle");
    assert!(!PathTopology::Forward.uses_second_path());
    assert!(PathTopology::Boost.uses_second_path());
}
