use std::fs;

use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("kira-velosim").chain(args.iter().copied())).unwrap()
}

#[test]
fn test_generate_defaults() {
    let cli = parse(&["generate", "--out", "out"]);
    let Command::Generate(args) = cli.command else {
        panic!("expected generate");
    };
    assert_eq!(args.topology, TopologyArg::Forward);
    assert_eq!(args.genes, 100);
    assert_eq!(args.common.seed, 0);
    assert_eq!(args.common.profile, ProfileArg::Default);
    assert!(!args.common.gzip);

    let spec = build_spec(&args);
    assert_eq!(spec.topology, PathTopology::Forward);
    assert_eq!(spec.cell_count(), 1000);
    assert_eq!(spec.path1, KineticParams::new(2.0, 1.0, 1.0));
    assert_eq!(spec.path2_samples, 0);
}

#[test]
fn test_generate_second_regime_defaults() {
    let cli = parse(&[
        "generate",
        "--out",
        "out",
        "--topology",
        "two-alpha",
        "--alpha1",
        "5",
        "--beta1",
        "2",
        "--gamma1",
        "3",
        "--path1-samples",
        "40",
    ]);
    let Command::Generate(args) = cli.command else {
        panic!("expected generate");
    };
    let spec = build_spec(&args);
    assert_eq!(spec.topology, PathTopology::TwoAlpha);
    assert_eq!(spec.path2, KineticParams::new(0.0, 2.0, 3.0));
    assert_eq!(spec.path2_samples, 40);
    assert_eq!(spec.cell_count(), 80);
}

#[test]
fn test_topology_names_parse() {
    for (name, topology) in [
        ("backward", PathTopology::Backward),
        ("multipath", PathTopology::Multipath),
        ("float-circle", PathTopology::FloatCircle),
        ("boost", PathTopology::Boost),
    ] {
        let cli = parse(&["generate", "--out", "o", "--topology", name]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(PathTopology::from(args.topology), topology);
    }
}

#[test]
fn test_missing_out_is_rejected() {
    assert!(Cli::try_parse_from(["kira-velosim", "generate"]).is_err());
    assert!(Cli::try_parse_from(["kira-velosim", "schedule", "--out", "o", "--input", "x"]).is_err());
}

#[test]
fn test_resolve_params_overrides() {
    let cli = parse(&[
        "regimes", "--input", "r.tsv", "--out", "o", "--profile", "precise", "--noise", "0",
        "--dt", "0.01",
    ]);
    let Command::Regimes(args) = cli.command else {
        panic!("expected regimes");
    };
    let params = resolve_params(&args.common).unwrap();
    assert_eq!(params.rtol, 1e-8);
    assert_eq!(params.noise_level, 0.0);
    assert_eq!(params.dt, 0.01);

    let cli = parse(&["regimes", "--input", "r.tsv", "--out", "o", "--noise=-1"]);
    let Command::Regimes(args) = cli.command else {
        panic!("expected regimes");
    };
    assert!(matches!(resolve_params(&args.common), Err(AppError::Usage(_))));
}

#[test]
fn test_resolve_params_from_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");
    fs::write(&path, r#"{"noise_level": 0.5, "dt": 0.002}"#).unwrap();
    let path_arg = path.display().to_string();
    let cli = parse(&["schedule", "--input", "c.tsv", "--total-time", "3", "--out", "o", "--params", path_arg.as_str()]);
    let Command::Schedule(args) = cli.command else {
        panic!("expected schedule");
    };
    assert_eq!(args.total_time, 3.0);
    let params = resolve_params(&args.common).unwrap();
    assert_eq!(params.noise_level, 0.5);
    assert_eq!(params.dt, 0.002);
    assert_eq!(params.rtol, 1e-3);
}

#[test]
fn test_params_file_layers_over_selected_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");
    fs::write(&path, r#"{"noise_level": 0.0}"#).unwrap();
    let path_arg = path.display().to_string();
    let cli = parse(&[
        "regimes", "--input", "r.tsv", "--out", "o", "--profile", "precise", "--params",
        path_arg.as_str(),
    ]);
    let Command::Regimes(args) = cli.command else {
        panic!("expected regimes");
    };
    let params = resolve_params(&args.common).unwrap();
    assert_eq!(params.noise_level, 0.0);
    assert_eq!(params.rtol, 1e-8);
    assert_eq!(params.atol, 1e-10);
}

#[test]
fn test_regimes_command_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("regimes.tsv");
    fs::write(
        &input,
        "gene_name\tstart_u\tstart_s\talpha\tbeta\tgamma\tstart_pct\tend_pct\tsamples\n\
         g\t0\t0\t10\t10\t10\t0.1\t99\t20\n\
         g\t\t\t0\t10\t10\t0\t90\t10\n",
    )
    .unwrap();
    let out = dir.path().join("out");
    let input_arg = input.display().to_string();
    let out_arg = out.display().to_string();
    let cli = parse(&["regimes", "--input", input_arg.as_str(), "--out", out_arg.as_str(), "--seed", "4"]);
    run(cli).unwrap();

    let text = fs::read_to_string(out.join("path.tsv")).unwrap();
    assert_eq!(text.lines().count(), 31);
    assert!(text.lines().skip(1).all(|line| line.starts_with("g\t")));
    let regimes = fs::read_to_string(out.join("regimes.tsv")).unwrap();
    assert_eq!(regimes.lines().count(), 3);
    assert!(regimes.lines().nth(2).unwrap().starts_with("g\t\t\t0.0\t"));
    assert!(out.join("summary.json").exists());
}
