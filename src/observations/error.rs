use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObservationError {
    #[error("No parquet data file found in '{0}'")]
    NoDataFile(PathBuf),

    #[error("Failed to read data directory '{0}'")]
    DataDirRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to read metadata for data file '{0}'")]
    DataFileMetadata(PathBuf, #[source] std::io::Error),

    #[error("Failed to scan parquet data file '{0}'")]
    ParquetScan(PathBuf, #[source] PolarsError),

    #[error("Column '{column}' has type {dtype}, expected a date, datetime or string column")]
    UnsupportedDateType { column: String, dtype: String },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
