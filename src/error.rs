use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems with the metadata table. These abort startup.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("metadata is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: could not convert '{value}' in column '{column}' to a number")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Problems with a single experiment file. The figure builder skips the row.
#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: '{value}' in column '{column}' is not a number")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType {
        column: &'static str,
        data_type: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum ColorScaleError {
    #[error("no metadata rows with a valid Darcy number")]
    Empty,

    #[error("log color scale needs positive Darcy numbers, got minimum {0}")]
    NonPositive(f64),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
