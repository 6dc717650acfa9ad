pub mod stage1_integrate;
pub mod stage2_invert;
pub mod stage3_segment;
pub mod stage4_noise;
pub mod stage5_compose;
pub mod stage6_assemble;
pub mod stage7_output;

use thiserror::Error;

use crate::model::ModelError;
use crate::solver::SolverError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("numerical integration failed: {0}")]
    Solver(#[from] SolverError),
    #[error("percentage window unreachable: {0}")]
    Unreachable(String),
    #[error("path for {gene} produced {produced} rows, {requested} cells requested")]
    ShortPath {
        gene: String,
        produced: usize,
        requested: usize,
    },
}
