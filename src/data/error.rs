use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DataError>;

/// Failures that abort a dataset load.
///
/// Per-cell parse problems (bad dates, "N/A" scores, empty pollutant cells) are
/// *not* represented here: they are normalized in place and counted in the
/// [`LoadReport`](super::model::LoadReport).
#[derive(Error, Debug)]
pub enum DataError {
    /// The dataset location is missing or unreadable. Fatal to the session.
    #[error("cannot read dataset '{}': {source}", path.display())]
    DataSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid JSON layout: {0}")]
    JsonLayout(String),

    #[error("Parquet read error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl DataError {
    pub fn data_source(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::DataSource {
            path: path.into(),
            source,
        }
    }

    /// Whether this is the session-fatal "location unreadable" case.
    pub fn is_data_source(&self) -> bool {
        matches!(self, DataError::DataSource { .. })
    }
}
