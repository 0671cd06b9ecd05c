use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("no rows with a parseable created_at timestamp; nothing to aggregate")]
    EmptyResult,

    #[error("cache artifact {path} is corrupt: {reason}")]
    CacheCorruption { path: String, reason: String },

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
