use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::model::params::SimParams;
use crate::model::regime::{Regime, StartState};
use crate::model::topology::PathSpec;
use crate::model::trajectory::TrajectoryTable;
use crate::pipeline::stage5_compose::{RegimePath, ScheduleTable};
use crate::pipeline::stage6_assemble::{Layers, LongRecord, WideDataset};
use crate::report::json::render_summary_json;
use crate::report::text::render_report_text;
use crate::report::tsv::{write_matrix, write_records};
use crate::report::{NamedStats, OutputError, PathSummary, SummaryData, named_stats};

#[derive(Debug, Serialize)]
struct PathRow<'a> {
    gene_name: &'a str,
    u0: f64,
    s0: f64,
    u1: f64,
    s1: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
}

#[derive(Debug, Serialize)]
struct ScheduleRow {
    u0: f64,
    s0: f64,
    u1: f64,
    s1: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
    t: f64,
}

#[derive(Debug, Serialize)]
struct RegimeRow<'a> {
    gene_name: &'a str,
    start_u: Option<f64>,
    start_s: Option<f64>,
    alpha: f64,
    beta: f64,
    gamma: f64,
    start_pct: f64,
    end_pct: f64,
    samples: usize,
}

impl<'a> From<&'a Regime> for RegimeRow<'a> {
    fn from(regime: &'a Regime) -> Self {
        let start = match regime.start {
            StartState::Fresh(state) => Some(state),
            StartState::Continue => None,
        };
        Self {
            gene_name: &regime.gene_name,
            start_u: start.map(|s| s.u),
            start_s: start.map(|s| s.s),
            alpha: regime.rates.alpha,
            beta: regime.rates.beta,
            gamma: regime.rates.gamma,
            start_pct: regime.window.start_pct,
            end_pct: regime.window.end_pct,
            samples: regime.samples,
        }
    }
}

#[derive(Debug, Serialize)]
struct CellRow<'a> {
    barcode: &'a str,
}

#[derive(Debug, Clone)]
pub struct RunInfo {
    pub command: String,
    pub seed: u64,
    pub params: SimParams,
    pub path: Option<PathSpec>,
}

/// Where a run's files were written.
#[derive(Debug, Clone, Default)]
pub struct WrittenFiles {
    pub files: Vec<PathBuf>,
}

fn path_summary(spec: &PathSpec) -> PathSummary {
    PathSummary {
        topology: spec.topology.name().to_string(),
        alpha1: spec.path1.alpha,
        beta1: spec.path1.beta,
        gamma1: spec.path1.gamma,
        alpha2: spec.path2.alpha,
        beta2: spec.path2.beta,
        gamma2: spec.path2.gamma,
        path1_pct: spec.path1_pct,
        path2_pct: spec.path2_pct,
        path1_samples: spec.path1_samples,
        path2_samples: if spec.topology.uses_second_path() {
            spec.path2_samples
        } else {
            0
        },
    }
}

fn flatten(layer: &[Vec<f64>]) -> Vec<f64> {
    layer.iter().flatten().copied().collect()
}

pub fn layer_stats(layers: &Layers) -> Vec<NamedStats> {
    Layers::NAMES
        .iter()
        .filter_map(|name| layers.get(name).map(|l| named_stats(name, &flatten(l))))
        .collect()
}

fn table_stats(table: &TrajectoryTable) -> Vec<NamedStats> {
    vec![
        named_stats("u0", &table.u0),
        named_stats("s0", &table.s0),
        named_stats("u1", &table.u1),
        named_stats("s1", &table.s1),
    ]
}

pub fn build_summary(
    run: &RunInfo,
    n_genes: usize,
    n_cells: usize,
    n_rows: usize,
    layers: Vec<NamedStats>,
) -> SummaryData {
    SummaryData {
        tool_name: env!("CARGO_PKG_NAME").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        command: run.command.clone(),
        seed: run.seed,
        params: run.params.clone(),
        path: run.path.as_ref().map(path_summary),
        n_genes,
        n_cells,
        n_rows,
        layers,
    }
}

fn write_text(path: &Path, content: &str) -> Result<(), OutputError> {
    fs::write(path, content)?;
    Ok(())
}

fn write_summary(
    out_dir: &Path,
    summary: &SummaryData,
    written: &mut WrittenFiles,
) -> Result<(), OutputError> {
    let summary_path = out_dir.join("summary.json");
    write_text(&summary_path, &render_summary_json(summary)?)?;
    written.files.push(summary_path);

    let report_path = out_dir.join("report.txt");
    write_text(&report_path, &render_report_text(summary))?;
    written.files.push(report_path);
    Ok(())
}

/// Writes the long table, gene/cell annotations, optionally the primary
/// (spliced) matrix with one matrix per layer, and the run summary.
pub fn write_dataset(
    out_dir: &Path,
    wide: &WideDataset,
    long: &[LongRecord],
    run: &RunInfo,
    write_layers: bool,
    compress: bool,
) -> Result<WrittenFiles, OutputError> {
    fs::create_dir_all(out_dir)?;
    let mut written = WrittenFiles::default();
    let ext = if compress { "tsv.gz" } else { "tsv" };

    let long_path = out_dir.join(format!("simulation.{ext}"));
    write_records(&long_path, long)?;
    written.files.push(long_path);

    let genes_path = out_dir.join("genes.tsv");
    write_records(&genes_path, &wide.genes)?;
    written.files.push(genes_path);

    let cells_path = out_dir.join("cells.tsv");
    write_records(
        &cells_path,
        wide.barcodes.iter().map(|b| CellRow { barcode: b }),
    )?;
    written.files.push(cells_path);

    if write_layers {
        let layers_dir = out_dir.join("layers");
        fs::create_dir_all(&layers_dir)?;
        let gene_names: Vec<String> = wide.genes.iter().map(|g| g.gene_name.clone()).collect();

        let matrix_path = out_dir.join(format!("matrix.{ext}"));
        write_matrix(&matrix_path, "barcode", &wide.barcodes, &gene_names, wide.spliced())?;
        written.files.push(matrix_path);

        for name in Layers::NAMES {
            if let Some(layer) = wide.layers.get(name) {
                let path = layers_dir.join(format!("{name}.{ext}"));
                write_matrix(&path, "barcode", &wide.barcodes, &gene_names, layer)?;
                written.files.push(path);
            }
        }
    }

    let summary = build_summary(
        run,
        wide.n_genes(),
        wide.n_cells(),
        long.len(),
        layer_stats(&wide.layers),
    );
    write_summary(out_dir, &summary, &mut written)?;

    Ok(written)
}

/// Writes a regime-table run: the composed path with each row's gene name,
/// and the parsed regimes themselves.
pub fn write_path(
    out_dir: &Path,
    path: &RegimePath,
    run: &RunInfo,
    compress: bool,
) -> Result<WrittenFiles, OutputError> {
    fs::create_dir_all(out_dir)?;
    let mut written = WrittenFiles::default();
    let ext = if compress { "tsv.gz" } else { "tsv" };
    let table = &path.table;

    let path_file = out_dir.join(format!("path.{ext}"));
    write_records(
        &path_file,
        path.row_genes().enumerate().map(|(i, gene_name)| PathRow {
            gene_name,
            u0: table.u0[i],
            s0: table.s0[i],
            u1: table.u1[i],
            s1: table.s1[i],
            alpha: table.alpha[i],
            beta: table.beta[i],
            gamma: table.gamma[i],
        }),
    )?;
    written.files.push(path_file);

    let regimes_file = out_dir.join(format!("regimes.{ext}"));
    write_records(&regimes_file, path.regimes.iter().map(RegimeRow::from))?;
    written.files.push(regimes_file);

    let n_genes = path
        .regimes
        .iter()
        .map(|r| r.gene_name.as_str())
        .collect::<BTreeSet<_>>()
        .len();
    let summary = build_summary(run, n_genes, table.len(), table.len(), table_stats(table));
    write_summary(out_dir, &summary, &mut written)?;
    Ok(written)
}

/// Writes a per-cell schedule path with its time column.
pub fn write_schedule(
    out_dir: &Path,
    schedule: &ScheduleTable,
    run: &RunInfo,
    compress: bool,
) -> Result<WrittenFiles, OutputError> {
    fs::create_dir_all(out_dir)?;
    let mut written = WrittenFiles::default();
    let ext = if compress { "tsv.gz" } else { "tsv" };
    let table = &schedule.table;

    let path = out_dir.join(format!("schedule.{ext}"));
    write_records(
        &path,
        (0..table.len()).map(|i| ScheduleRow {
            u0: table.u0[i],
            s0: table.s0[i],
            u1: table.u1[i],
            s1: table.s1[i],
            alpha: table.alpha[i],
            beta: table.beta[i],
            gamma: table.gamma[i],
            t: schedule.t[i],
        }),
    )?;
    written.files.push(path);

    let summary = build_summary(run, 1, table.len(), table.len(), table_stats(table));
    write_summary(out_dir, &summary, &mut written)?;
    Ok(written)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage7_output.rs"]
mod tests;
