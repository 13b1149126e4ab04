use thiserror::Error;

use crate::model::ModelFamily;

/// Errors raised by the data, model and figure layers.
///
/// Binaries wrap these in `anyhow` and print the full chain; the library
/// itself never swallows one and hands back default data instead.
#[derive(Debug, Error)]
pub enum Error {
    /// A required configuration value is missing or invalid. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A named dataset could not be retrieved (network, auth, missing object).
    #[error("dataset '{name}' is unavailable")]
    DataUnavailable {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("column '{0}' not found")]
    MissingColumn(String),

    /// Failure reported by a decision-forest backend.
    #[error("training {family} on {dataset} failed: {message}")]
    Training {
        family: ModelFamily,
        dataset: String,
        message: String,
    },

    #[error("split ratio {0} is outside [0, 1]")]
    InvalidRatio(f64),

    /// Structural problem with a dataset (ragged or duplicated columns, bad mask).
    #[error("invalid dataset: {0}")]
    Schema(String),

    #[error("column '{column}' row {row}: '{value}' is not numeric")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
