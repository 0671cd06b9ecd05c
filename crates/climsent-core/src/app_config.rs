use std::path::PathBuf;

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime settings for every analysis command.
///
/// Each field has a default, so an empty environment yields a usable config
/// pointing at `climate_data.csv` in the working directory.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Tweet dataset with at least `created_at` and `sentiment` columns.
    pub data_path: PathBuf,
    /// Location of the monthly pivot artifact. A `.meta.json` sidecar sits next to it.
    pub cache_path: PathBuf,
    /// First day of the default aggregation window (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the default aggregation window (inclusive).
    pub end_date: NaiveDate,
    pub sample_seed: u64,
    pub max_scatter_points: usize,
    pub top_topics: usize,
}
