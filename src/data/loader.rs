use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type, Schema};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{ExperimentData, Metadata, MetadataRow};
use crate::error::{ExperimentError, MetadataError};

pub const NAME: &str = "Name";
pub const KEY: &str = "Key";
pub const PR_P: &str = "Pr_p";
pub const DA: &str = "Da";
pub const RA_D: &str = "Ra_D";
pub const NU: &str = "Nu";

/// Cell contents treated as a missing value, matching the usual
/// spreadsheet/dataframe conventions.
const NA_TOKENS: &[&str] = &[
    "", "nan", "NaN", "-nan", "-NaN", "NA", "N/A", "n/a", "#N/A", "<NA>", "NULL", "null",
    "None",
];

// ---------------------------------------------------------------------------
// Metadata table
// ---------------------------------------------------------------------------

/// Load and clean the metadata table.
///
/// Header names are whitespace-trimmed. `Pr_p` may carry comma thousands
/// separators (`"1,000"`). Rows where `Pr_p` or `Da` is missing are dropped;
/// a non-empty cell that is not a number is a hard error.
pub fn load_metadata(path: &Path) -> Result<Metadata, MetadataError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|source| MetadataError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    read_metadata(reader, path)
}

/// Same as [`load_metadata`] but from any reader; `origin` is only used in
/// error messages.
pub fn read_metadata<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    origin: &Path,
) -> Result<Metadata, MetadataError> {
    let csv_err = |source| MetadataError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(csv_err)?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(MetadataError::MissingColumn(name))
    };
    let name_idx = column(NAME)?;
    let key_idx = column(KEY)?;
    let pr_idx = column(PR_P)?;
    let da_idx = column(DA)?;

    let mut meta = Metadata::default();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let pr_raw = cell(pr_idx).replace(',', "");
        let pr_p = parse_cell(&pr_raw).map_err(|value| MetadataError::InvalidNumber {
            row: row_no,
            column: PR_P,
            value,
        })?;
        let da = parse_cell(cell(da_idx)).map_err(|value| MetadataError::InvalidNumber {
            row: row_no,
            column: DA,
            value,
        })?;

        match (pr_p, da) {
            (Some(pr_p), Some(da)) => meta.rows.push(MetadataRow {
                name: cell(name_idx).to_string(),
                key: cell(key_idx).to_string(),
                pr_p,
                da,
            }),
            _ => meta.dropped += 1,
        }
    }

    log::info!(
        "Loaded {} metadata rows from {} ({} dropped for missing Pr_p/Da)",
        meta.len(),
        origin.display(),
        meta.dropped
    );
    Ok(meta)
}

/// `Ok(None)` for a missing value, `Err(raw)` when the text is not a number.
fn parse_cell(raw: &str) -> Result<Option<f64>, String> {
    let s = raw.trim();
    if NA_TOKENS.contains(&s) {
        return Ok(None);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(raw.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Experiment files
// ---------------------------------------------------------------------------

/// Location of the data file for an experiment key.
pub fn experiment_path(data_dir: &Path, key: &str, extension: &str) -> PathBuf {
    data_dir.join(format!("{key}.{extension}"))
}

/// Load an experiment's `Ra_D` / `Nu` columns.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, numeric `Ra_D` and `Nu` columns
/// * `.parquet` – flat numeric `Ra_D` and `Nu` columns
pub fn load_experiment(path: &Path) -> Result<ExperimentData, ExperimentError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(ExperimentError::UnsupportedExtension(other.to_string())),
    }
}

fn load_csv(path: &Path) -> Result<ExperimentData, ExperimentError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(ExperimentError::MissingColumn(name))
    };
    let ra_idx = column(RA_D)?;
    let nu_idx = column(NU)?;

    let mut data = ExperimentData::default();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        data.ra_d
            .push(parse_measurement(record.get(ra_idx).unwrap_or(""), row_no, RA_D)?);
        data.nu
            .push(parse_measurement(record.get(nu_idx).unwrap_or(""), row_no, NU)?);
    }
    Ok(data)
}

fn parse_measurement(raw: &str, row: usize, column: &'static str) -> Result<f64, ExperimentError> {
    parse_cell(raw)
        .map(|v| v.unwrap_or(f64::NAN))
        .map_err(|value| ExperimentError::InvalidNumber { row, column, value })
}

fn load_parquet(path: &Path) -> Result<ExperimentData, ExperimentError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let ra_idx = schema_index(builder.schema(), RA_D)?;
    let nu_idx = schema_index(builder.schema(), NU)?;
    let reader = builder.build()?;

    let mut data = ExperimentData::default();
    for batch in reader {
        let batch = batch?;
        data.ra_d.extend(numeric_values(batch.column(ra_idx), RA_D)?);
        data.nu.extend(numeric_values(batch.column(nu_idx), NU)?);
    }
    Ok(data)
}

fn schema_index(schema: &Schema, name: &'static str) -> Result<usize, ExperimentError> {
    schema
        .fields()
        .iter()
        .position(|f| f.name().trim() == name)
        .ok_or(ExperimentError::MissingColumn(name))
}

/// Read a flat numeric Arrow column as `f64`, nulls become `NaN`.
fn numeric_values(col: &ArrayRef, name: &'static str) -> Result<Vec<f64>, ExperimentError> {
    let values: Vec<f64> = match col.data_type() {
        DataType::Float64 => col
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect(),
        DataType::Float32 => col
            .as_primitive::<Float32Type>()
            .iter()
            .map(|v| v.map_or(f64::NAN, f64::from))
            .collect(),
        DataType::Int64 => col
            .as_primitive::<Int64Type>()
            .iter()
            .map(|v| v.map_or(f64::NAN, |i| i as f64))
            .collect(),
        DataType::Int32 => col
            .as_primitive::<Int32Type>()
            .iter()
            .map(|v| v.map_or(f64::NAN, f64::from))
            .collect(),
        other => {
            return Err(ExperimentError::UnsupportedColumnType {
                column: name,
                data_type: format!("{other:?}"),
            })
        }
    };
    Ok(values)
}
