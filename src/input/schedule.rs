use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::input::{InputError, table_reader};
use crate::model::kinetics::KineticParams;

#[derive(Debug, Deserialize)]
struct RateRecord {
    alpha: f64,
    beta: f64,
    gamma: f64,
}

/// Per-cell rate schedule: one (alpha, beta, gamma) row per cell, in time order.
pub fn schedule_from_reader<R: Read>(
    reader: csv::Reader<R>,
    source_name: &str,
) -> Result<Vec<KineticParams>, InputError> {
    let mut reader = reader;
    let mut cells = Vec::new();
    for (idx, record) in reader.deserialize::<RateRecord>().enumerate() {
        let record = record?;
        let rates = KineticParams::new(record.alpha, record.beta, record.gamma);
        rates.validate().map_err(|source| InputError::Row {
            path: source_name.to_string(),
            row: idx + 1,
            source,
        })?;
        cells.push(rates);
    }
    if cells.is_empty() {
        return Err(InputError::InvalidInput(format!(
            "{source_name}: rate schedule has no rows"
        )));
    }
    Ok(cells)
}

pub fn parse_schedule(path: &Path) -> Result<Vec<KineticParams>, InputError> {
    let reader = table_reader(path)?;
    let cells = schedule_from_reader(reader, &path.display().to_string())?;
    tracing::info!(cells = cells.len(), "loaded rate schedule {}", path.display());
    Ok(cells)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/schedule.rs"]
mod tests;
