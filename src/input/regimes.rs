use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::input::{InputError, table_reader};
use crate::model::ModelError;
use crate::model::kinetics::{KineticParams, State};
use crate::model::regime::{PercentWindow, Regime, StartState};

#[derive(Debug, Deserialize)]
struct RegimeRecord {
    gene_name: String,
    #[serde(default)]
    start_u: Option<String>,
    #[serde(default)]
    start_s: Option<String>,
    alpha: f64,
    beta: f64,
    gamma: f64,
    start_pct: f64,
    end_pct: f64,
    samples: usize,
}

fn parse_optional(raw: Option<&str>, column: &str, row: usize) -> Result<Option<f64>, InputError> {
    let Some(value) = raw.map(str::trim) else {
        return Ok(None);
    };
    if value.is_empty()
        || value.eq_ignore_ascii_case("none")
        || value.eq_ignore_ascii_case("na")
        || value.eq_ignore_ascii_case("null")
    {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| InputError::Parse(format!("row {row}: {column} is not a number: {value}")))
}

fn to_regime(record: RegimeRecord, row: usize, source_name: &str) -> Result<Regime, InputError> {
    let start_u = parse_optional(record.start_u.as_deref(), "start_u", row)?;
    let start_s = parse_optional(record.start_s.as_deref(), "start_s", row)?;
    let start = match (start_u, start_s) {
        (Some(u), Some(s)) => StartState::Fresh(State::new(u, s)),
        (None, None) => StartState::Continue,
        _ => {
            return Err(InputError::InvalidInput(format!(
                "row {row}: start_u and start_s must be both set or both empty"
            )));
        }
    };
    let window = PercentWindow::new(record.start_pct, record.end_pct).map_err(|source| {
        InputError::Row {
            path: source_name.to_string(),
            row,
            source,
        }
    })?;
    Ok(Regime {
        gene_name: record.gene_name,
        start,
        rates: KineticParams::new(record.alpha, record.beta, record.gamma),
        window,
        samples: record.samples,
    })
}

/// Parses a regime table. Rows whose start_u/start_s are empty continue from
/// the previous row's end state; the first row must carry a start.
pub fn regimes_from_reader<R: Read>(
    reader: csv::Reader<R>,
    source_name: &str,
) -> Result<Vec<Regime>, InputError> {
    let mut reader = reader;
    let mut regimes = Vec::new();
    for (idx, record) in reader.deserialize::<RegimeRecord>().enumerate() {
        let row = idx + 1;
        let record = record?;
        let regime = to_regime(record, row, source_name)?;
        regime.validate().map_err(|source| InputError::Row {
            path: source_name.to_string(),
            row,
            source,
        })?;
        if row == 1 && regime.start == StartState::Continue {
            return Err(InputError::Row {
                path: source_name.to_string(),
                row,
                source: ModelError::MissingFirstStart,
            });
        }
        regimes.push(regime);
    }
    if regimes.is_empty() {
        return Err(InputError::InvalidInput(format!(
            "{source_name}: regime table has no rows"
        )));
    }
    Ok(regimes)
}

pub fn parse_regimes(path: &Path) -> Result<Vec<Regime>, InputError> {
    let reader = table_reader(path)?;
    let regimes = regimes_from_reader(reader, &path.display().to_string())?;
    tracing::info!(rows = regimes.len(), "loaded regime table {}", path.display());
    Ok(regimes)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/regimes.rs"]
mod tests;
