use rand::Rng;
use serde::Serialize;

use crate::model::params::SimParams;
use crate::model::topology::PathSpec;
use crate::model::trajectory::TrajectoryTable;
use crate::pipeline::SimError;
use crate::pipeline::stage4_noise::apply_noise;
use crate::pipeline::stage5_compose::compose_path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneInfo {
    pub gene_name: String,
    #[serde(rename = "type")]
    pub topology: String,
    pub alpha1: f64,
    pub alpha2: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub gamma1: f64,
    pub gamma2: f64,
    pub path1_pct: f64,
    pub path2_pct: f64,
    pub samples: usize,
}

/// Per-gene layers, indexed `[gene][cell]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layers {
    pub u0s: Vec<Vec<f64>>,
    pub s0s: Vec<Vec<f64>>,
    pub u1s: Vec<Vec<f64>>,
    pub s1s: Vec<Vec<f64>>,
    pub alphas: Vec<Vec<f64>>,
    pub betas: Vec<Vec<f64>>,
    pub gammas: Vec<Vec<f64>>,
}

impl Layers {
    pub const NAMES: [&'static str; 7] = ["u0s", "s0s", "u1s", "s1s", "alphas", "betas", "gammas"];

    pub fn get(&self, name: &str) -> Option<&[Vec<f64>]> {
        let layer = match name {
            "u0s" => &self.u0s,
            "s0s" => &self.s0s,
            "u1s" => &self.u1s,
            "s1s" => &self.s1s,
            "alphas" => &self.alphas,
            "betas" => &self.betas,
            "gammas" => &self.gammas,
            _ => return None,
        };
        Some(layer.as_slice())
    }

    fn push_gene(&mut self, table: TrajectoryTable) {
        self.u0s.push(table.u0);
        self.s0s.push(table.s0);
        self.u1s.push(table.u1);
        self.s1s.push(table.s1);
        self.alphas.push(table.alpha);
        self.betas.push(table.beta);
        self.gammas.push(table.gamma);
    }
}

/// Cell-by-gene dataset before reshaping; the primary matrix is spliced
/// abundance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideDataset {
    pub genes: Vec<GeneInfo>,
    pub barcodes: Vec<String>,
    pub layers: Layers,
}

impl WideDataset {
    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_cells(&self) -> usize {
        self.barcodes.len()
    }

    pub fn spliced(&self) -> &[Vec<f64>] {
        &self.layers.s0s
    }
}

/// One (gene, cell) row of the long-format output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRecord {
    pub gene_name: String,
    pub unsplice: f64,
    pub splice: f64,
    pub u1: f64,
    pub s1: f64,
    pub embedding1: f64,
    pub embedding2: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub path1_pct: f64,
    pub path2_pct: f64,
    #[serde(rename = "cellID")]
    pub cell_id: usize,
    pub clusters: Option<String>,
}

pub fn gene_name(index: usize) -> String {
    format!("simulation{index:03}")
}

/// Simulates `n_genes` genes sharing `spec`, each with its own noise draw,
/// truncated to `cells` rows (default: the topology's total sample count).
pub fn assemble<R: Rng + ?Sized>(
    n_genes: usize,
    spec: &PathSpec,
    cells: Option<usize>,
    params: &SimParams,
    rng: &mut R,
) -> Result<WideDataset, SimError> {
    spec.validate()?;
    params.validate()?;
    let n_cells = cells.unwrap_or_else(|| spec.cell_count());

    let mut wide = WideDataset {
        genes: Vec::with_capacity(n_genes),
        barcodes: (0..n_cells).map(|i| i.to_string()).collect(),
        layers: Layers::default(),
    };

    for idx in 0..n_genes {
        let name = gene_name(idx);
        let mut table = compose_path(spec, params)?;
        apply_noise(&mut table, params.noise_level, rng);
        if table.len() < n_cells {
            return Err(SimError::ShortPath {
                gene: name,
                produced: table.len(),
                requested: n_cells,
            });
        }
        table.truncate(n_cells);
        tracing::debug!(gene = %name, rows = table.len(), "gene simulated");

        wide.genes.push(GeneInfo {
            gene_name: name,
            topology: spec.topology.name().to_string(),
            alpha1: spec.path1.alpha,
            alpha2: spec.path2.alpha,
            beta1: spec.path1.beta,
            beta2: spec.path2.beta,
            gamma1: spec.path1.gamma,
            gamma2: spec.path2.gamma,
            path1_pct: spec.path1_pct,
            path2_pct: spec.path2_pct,
            samples: table.len(),
        });
        wide.layers.push_gene(table);
    }

    Ok(wide)
}

/// Reshapes the wide dataset gene by gene into (gene, cell) rows with a
/// running cell identifier and no cluster label.
pub fn to_long(wide: &WideDataset) -> Vec<LongRecord> {
    let mut out = Vec::with_capacity(wide.n_genes() * wide.n_cells());
    let layers = &wide.layers;
    for (g, info) in wide.genes.iter().enumerate() {
        for c in 0..layers.u0s[g].len() {
            let unsplice = layers.u0s[g][c];
            let splice = layers.s0s[g][c];
            let cell_id = out.len();
            out.push(LongRecord {
                gene_name: info.gene_name.clone(),
                unsplice,
                splice,
                u1: layers.u1s[g][c],
                s1: layers.s1s[g][c],
                embedding1: unsplice,
                embedding2: splice,
                alpha: layers.alphas[g][c],
                beta: layers.betas[g][c],
                gamma: layers.gammas[g][c],
                path1_pct: info.path1_pct,
                path2_pct: info.path2_pct,
                cell_id,
                clusters: None,
            });
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_assemble.rs"]
mod tests;
