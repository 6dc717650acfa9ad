pub mod json;
pub mod text;
pub mod tsv;

use serde::Serialize;
use thiserror::Error;

use crate::model::params::SimParams;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedStats {
    pub name: String,
    pub median: f64,
    pub p90: f64,
    pub p99: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathSummary {
    pub topology: String,
    pub alpha1: f64,
    pub beta1: f64,
    pub gamma1: f64,
    pub alpha2: f64,
    pub beta2: f64,
    pub gamma2: f64,
    pub path1_pct: f64,
    pub path2_pct: f64,
    pub path1_samples: usize,
    pub path2_samples: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool_name: String,
    pub tool_version: String,
    pub command: String,
    pub seed: u64,
    pub params: SimParams,
    pub path: Option<PathSummary>,
    pub n_genes: usize,
    pub n_cells: usize,
    pub n_rows: usize,
    pub layers: Vec<NamedStats>,
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn quantile_indexed(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    let idx = ((n - 1) as f64 * p).ceil() as usize;
    sorted[idx.min(n - 1)]
}

pub fn median(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.5)
}

pub fn p90(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.90)
}

pub fn p99(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.99)
}

/// Percentile `q` (0..=100) with linear interpolation between the two
/// nearest order statistics.
pub fn percentile_linear(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let pos = (sorted.len() - 1) as f64 * (q / 100.0).clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

pub fn named_stats(name: &str, values: &[f64]) -> NamedStats {
    NamedStats {
        name: name.to_string(),
        median: median(values),
        p90: p90(values),
        p99: p99(values),
        max: values.iter().copied().fold(0.0, f64::max),
    }
}
