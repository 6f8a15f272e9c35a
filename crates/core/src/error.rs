use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrendlexError {
    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("No raw CSV files found in {dir}. Run `trendlex fetch` first.")]
    NoRawData { dir: PathBuf },

    #[error("Dataset {path} has no rows")]
    EmptyDataset { path: PathBuf },

    #[error("API returned {status}: {message}")]
    ApiStatus { status: u16, message: String },

    #[error("Malformed API response: {reason}")]
    MalformedResponse { reason: String },

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Column `{column}` not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    #[error("Invalid value {value:?} in column `{column}`")]
    InvalidValue { column: String, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Chart rendering failed: {reason}")]
    Plot { reason: String },

    #[error("Cannot split dataset: {reason}")]
    DegenerateSplit { reason: String },

    #[error("Model error: {reason}")]
    Model { reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl TrendlexError {
    pub(crate) fn plot(err: impl std::fmt::Display) -> Self {
        TrendlexError::Plot {
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrendlexError>;
