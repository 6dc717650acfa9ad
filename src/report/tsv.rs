use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;

use crate::report::OutputError;

/// File sink that gzip-compresses when the path ends in `.gz`.
pub enum OutputSink {
    Plain(BufWriter<File>),
    Gz(GzEncoder<BufWriter<File>>),
}

impl OutputSink {
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = BufWriter::new(File::create(path)?);
        if path.extension().is_some_and(|ext| ext == "gz") {
            Ok(OutputSink::Gz(GzEncoder::new(file, Compression::default())))
        } else {
            Ok(OutputSink::Plain(file))
        }
    }

    pub fn finish(self) -> io::Result<()> {
        match self {
            OutputSink::Plain(mut w) => w.flush(),
            OutputSink::Gz(enc) => enc.finish()?.flush(),
        }
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputSink::Plain(w) => w.write(buf),
            OutputSink::Gz(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputSink::Plain(w) => w.flush(),
            OutputSink::Gz(w) => w.flush(),
        }
    }
}

fn tsv_writer(path: &Path) -> io::Result<csv::Writer<OutputSink>> {
    Ok(csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(OutputSink::create(path)?))
}

fn close(writer: csv::Writer<OutputSink>) -> Result<(), OutputError> {
    let sink = writer.into_inner().map_err(|e| e.into_error())?;
    sink.finish()?;
    Ok(())
}

/// Writes serializable rows as a headed TSV.
pub fn write_records<T, I>(path: &Path, records: I) -> Result<(), OutputError>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut w = tsv_writer(path)?;
    for record in records {
        w.serialize(record)?;
    }
    close(w)
}

/// Writes a `[column][row]` matrix transposed into rows, one column per name.
pub fn write_matrix(
    path: &Path,
    index_name: &str,
    row_names: &[String],
    column_names: &[String],
    columns: &[Vec<f64>],
) -> Result<(), OutputError> {
    let mut w = tsv_writer(path)?;
    let mut header = Vec::with_capacity(column_names.len() + 1);
    header.push(index_name.to_string());
    header.extend(column_names.iter().cloned());
    w.write_record(&header)?;

    let mut row = Vec::with_capacity(columns.len() + 1);
    for (r, name) in row_names.iter().enumerate() {
        row.clear();
        row.push(name.clone());
        for col in columns {
            row.push(col.get(r).map(|v| v.to_string()).unwrap_or_default());
        }
        w.write_record(&row)?;
    }
    close(w)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/tsv.rs"]
mod tests;
