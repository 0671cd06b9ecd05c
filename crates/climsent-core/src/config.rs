use chrono::NaiveDate;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_date = |var: &str, default: &str| -> Result<NaiveDate, ConfigError> {
        let raw = or_default(var, default);
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
            ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected YYYY-MM-DD: {e}"),
            }
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        match raw.parse::<usize>() {
            Ok(0) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            }),
            Ok(n) => Ok(n),
            Err(e) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        }
    };

    let env = parse_environment(&or_default("CLIMSENT_ENV", "development"))?;
    let log_level = or_default("CLIMSENT_LOG_LEVEL", "info");
    let data_path = PathBuf::from(or_default("CLIMSENT_DATA_PATH", "climate_data.csv"));
    let cache_path = PathBuf::from(or_default(
        "CLIMSENT_CACHE_PATH",
        "monthly_sentiment_counts.csv",
    ));

    let start_date = parse_date("CLIMSENT_START_DATE", "2006-01-01")?;
    let end_date = parse_date("CLIMSENT_END_DATE", "2011-12-31")?;
    if start_date > end_date {
        return Err(ConfigError::InvalidEnvVar {
            var: "CLIMSENT_END_DATE".to_string(),
            reason: format!("end date {end_date} is before start date {start_date}"),
        });
    }

    let sample_seed = parse_u64("CLIMSENT_SAMPLE_SEED", "42")?;
    let max_scatter_points = parse_positive_usize("CLIMSENT_MAX_SCATTER_POINTS", "2000")?;
    let top_topics = parse_positive_usize("CLIMSENT_TOP_TOPICS", "5")?;

    Ok(AppConfig {
        env,
        log_level,
        data_path,
        cache_path,
        start_date,
        end_date,
        sample_seed,
        max_scatter_points,
        top_topics,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than the three known names.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CLIMSENT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
