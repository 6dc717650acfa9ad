mod input;
mod logging;
mod model;
mod pipeline;
mod report;
mod solver;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::input::InputError;
use crate::input::params::load_params;
use crate::input::regimes::parse_regimes;
use crate::input::schedule::parse_schedule;
use crate::model::kinetics::KineticParams;
use crate::model::params::{ParamProfile, SimParams};
use crate::model::topology::{PathSpec, PathTopology};
use crate::pipeline::SimError;
use crate::pipeline::stage5_compose::{compose_regimes, compose_schedule};
use crate::pipeline::stage6_assemble::{assemble, to_long};
use crate::pipeline::stage7_output::{RunInfo, write_dataset, write_path, write_schedule};
use crate::report::OutputError;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("invalid arguments: {0}")]
    Usage(String),
}

#[derive(Debug, Parser)]
#[command(name = "kira-velosim", version, about)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate a gene panel from a topology preset.
    Generate(GenerateArgs),
    /// Chain the regimes of a table into a single path.
    Regimes(RegimesArgs),
    /// Integrate a per-cell rate schedule over a total time.
    Schedule(ScheduleArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TopologyArg {
    Forward,
    Backward,
    TwoAlpha,
    Multipath,
    FloatCircle,
    Boost,
}

impl From<TopologyArg> for PathTopology {
    fn from(value: TopologyArg) -> Self {
        match value {
            TopologyArg::Forward => PathTopology::Forward,
            TopologyArg::Backward => PathTopology::Backward,
            TopologyArg::TwoAlpha => PathTopology::TwoAlpha,
            TopologyArg::Multipath => PathTopology::Multipath,
            TopologyArg::FloatCircle => PathTopology::FloatCircle,
            TopologyArg::Boost => PathTopology::Boost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    Default,
    Precise,
}

impl From<ProfileArg> for ParamProfile {
    fn from(value: ProfileArg) -> Self {
        match value {
            ProfileArg::Default => ParamProfile::Default,
            ProfileArg::Precise => ParamProfile::Precise,
        }
    }
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Output directory.
    #[arg(long)]
    out: PathBuf,
    /// Seed for the noise generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, value_enum, default_value_t = ProfileArg::Default)]
    profile: ProfileArg,
    /// JSON file overriding individual parameters of the selected profile.
    #[arg(long)]
    params: Option<PathBuf>,
    /// Noise scale (sd = noise * p99 / 10).
    #[arg(long)]
    noise: Option<f64>,
    /// Euler step of the (u1, s1) look-ahead columns.
    #[arg(long)]
    dt: Option<f64>,
    /// Gzip tabular outputs.
    #[arg(long)]
    gzip: bool,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[arg(long, value_enum, default_value_t = TopologyArg::Forward)]
    topology: TopologyArg,
    #[arg(long, default_value_t = 100)]
    genes: usize,
    #[arg(long, default_value_t = 2.0)]
    alpha1: f64,
    #[arg(long, default_value_t = 1.0)]
    beta1: f64,
    #[arg(long, default_value_t = 1.0)]
    gamma1: f64,
    /// Second regime's alpha (defaults to 0, i.e. repression).
    #[arg(long)]
    alpha2: Option<f64>,
    /// Defaults to beta1.
    #[arg(long)]
    beta2: Option<f64>,
    /// Defaults to gamma1.
    #[arg(long)]
    gamma2: Option<f64>,
    #[arg(long = "path1-pct", default_value_t = 99.0)]
    path1_pct: f64,
    #[arg(long = "path2-pct", default_value_t = 99.0)]
    path2_pct: f64,
    #[arg(long = "path1-samples", default_value_t = 1000)]
    path1_samples: usize,
    /// Defaults to path1-samples.
    #[arg(long = "path2-samples")]
    path2_samples: Option<usize>,
    /// Cells kept per gene (default: every sampled row).
    #[arg(long)]
    cells: Option<usize>,
    /// Also write one matrix per layer.
    #[arg(long)]
    layers: bool,
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Args)]
struct RegimesArgs {
    /// Regime table (TSV or CSV, optionally gzipped).
    #[arg(long)]
    input: PathBuf,
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Args)]
struct ScheduleArgs {
    /// Per-cell rate table with alpha, beta, gamma columns.
    #[arg(long)]
    input: PathBuf,
    /// Total simulated time shared evenly across cells.
    #[arg(long = "total-time")]
    total_time: f64,
    #[command(flatten)]
    common: CommonArgs,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Generate(args) => run_generate(&args),
        Command::Regimes(args) => run_regimes(&args),
        Command::Schedule(args) => run_schedule(&args),
    }
}

fn resolve_params(common: &CommonArgs) -> Result<SimParams, AppError> {
    let mut params = SimParams::from_profile(common.profile.into());
    if let Some(path) = &common.params {
        params = load_params(path, params)?;
    }
    if let Some(noise) = common.noise {
        params = params.with_noise(noise);
    }
    if let Some(dt) = common.dt {
        params.dt = dt;
    }
    params
        .validate()
        .map_err(|e| AppError::Usage(e.to_string()))?;
    Ok(params)
}

fn build_spec(args: &GenerateArgs) -> PathSpec {
    let topology: PathTopology = args.topology.into();
    let path1 = KineticParams::new(args.alpha1, args.beta1, args.gamma1);
    if !topology.uses_second_path() {
        return PathSpec::single(topology, path1, args.path1_samples);
    }
    PathSpec {
        topology,
        path1,
        path2: KineticParams::new(
            args.alpha2.unwrap_or(0.0),
            args.beta2.unwrap_or(args.beta1),
            args.gamma2.unwrap_or(args.gamma1),
        ),
        path1_pct: args.path1_pct,
        path2_pct: args.path2_pct,
        path1_samples: args.path1_samples,
        path2_samples: args.path2_samples.unwrap_or(args.path1_samples),
    }
}

fn log_params(command: &str, seed: u64, params: &SimParams) {
    tracing::info!(
        command,
        seed,
        dt = params.dt,
        noise = params.noise_level,
        rtol = params.rtol,
        atol = params.atol,
        "starting run"
    );
}

fn run_generate(args: &GenerateArgs) -> Result<(), AppError> {
    let params = resolve_params(&args.common)?;
    let spec = build_spec(args);
    if args.genes == 0 {
        return Err(AppError::Usage("--genes must be at least 1".to_string()));
    }
    log_params("generate", args.common.seed, &params);
    tracing::info!(
        topology = spec.topology.name(),
        genes = args.genes,
        cells = spec.cell_count(),
        "simulating dataset"
    );

    let mut rng = StdRng::seed_from_u64(args.common.seed);
    let wide = assemble(args.genes, &spec, args.cells, &params, &mut rng)?;
    let long = to_long(&wide);

    let run = RunInfo {
        command: "generate".to_string(),
        seed: args.common.seed,
        params,
        path: Some(spec),
    };
    let written = write_dataset(
        &args.common.out,
        &wide,
        &long,
        &run,
        args.layers,
        args.common.gzip,
    )?;
    for path in &written.files {
        tracing::info!("wrote {}", path.display());
    }
    Ok(())
}

fn run_regimes(args: &RegimesArgs) -> Result<(), AppError> {
    let params = resolve_params(&args.common)?;
    log_params("regimes", args.common.seed, &params);
    let regimes = parse_regimes(&args.input)?;

    let mut rng = StdRng::seed_from_u64(args.common.seed);
    let path = compose_regimes(regimes, &params, &mut rng)?;

    let run = RunInfo {
        command: "regimes".to_string(),
        seed: args.common.seed,
        params,
        path: None,
    };
    let written = write_path(&args.common.out, &path, &run, args.common.gzip)?;
    for path in &written.files {
        tracing::info!("wrote {}", path.display());
    }
    Ok(())
}

fn run_schedule(args: &ScheduleArgs) -> Result<(), AppError> {
    let params = resolve_params(&args.common)?;
    log_params("schedule", args.common.seed, &params);
    let cells = parse_schedule(&args.input)?;

    let mut rng = StdRng::seed_from_u64(args.common.seed);
    let schedule = compose_schedule(&cells, args.total_time, &params, &mut rng)?;

    let run = RunInfo {
        command: "schedule".to_string(),
        seed: args.common.seed,
        params,
        path: None,
    };
    let written = write_schedule(&args.common.out, &schedule, &run, args.common.gzip)?;
    for path in &written.files {
        tracing::info!("wrote {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
