use std::collections::HashMap;
use std::env::VarError;
use std::path::Path;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "CLIMSENT_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.data_path, Path::new("climate_data.csv"));
    assert_eq!(cfg.cache_path, Path::new("monthly_sentiment_counts.csv"));
    assert_eq!(cfg.start_date, ymd(2006, 1, 1));
    assert_eq!(cfg.end_date, ymd(2011, 12, 31));
    assert_eq!(cfg.sample_seed, 42);
    assert_eq!(cfg.max_scatter_points, 2000);
    assert_eq!(cfg.top_topics, 5);
}

#[test]
fn build_app_config_reads_paths_and_dates() {
    let mut map = HashMap::new();
    map.insert("CLIMSENT_DATA_PATH", "/data/tweets.csv");
    map.insert("CLIMSENT_CACHE_PATH", "/tmp/pivot.csv");
    map.insert("CLIMSENT_START_DATE", "2008-03-01");
    map.insert("CLIMSENT_END_DATE", "2009-02-28");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.data_path, Path::new("/data/tweets.csv"));
    assert_eq!(cfg.cache_path, Path::new("/tmp/pivot.csv"));
    assert_eq!(cfg.start_date, ymd(2008, 3, 1));
    assert_eq!(cfg.end_date, ymd(2009, 2, 28));
}

#[test]
fn build_app_config_fails_on_invalid_climsent_env() {
    let mut map = HashMap::new();
    map.insert("CLIMSENT_ENV", "producton");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CLIMSENT_ENV"),
        "expected InvalidEnvVar(CLIMSENT_ENV), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_on_malformed_start_date() {
    let mut map = HashMap::new();
    map.insert("CLIMSENT_START_DATE", "01/01/2006");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CLIMSENT_START_DATE"),
        "expected InvalidEnvVar(CLIMSENT_START_DATE), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_when_start_after_end() {
    let mut map = HashMap::new();
    map.insert("CLIMSENT_START_DATE", "2012-01-01");
    map.insert("CLIMSENT_END_DATE", "2011-12-31");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CLIMSENT_END_DATE"),
        "expected InvalidEnvVar(CLIMSENT_END_DATE), got: {result:?}"
    );
}

#[test]
fn build_app_config_accepts_single_day_window() {
    let mut map = HashMap::new();
    map.insert("CLIMSENT_START_DATE", "2006-01-01");
    map.insert("CLIMSENT_END_DATE", "2006-01-01");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.start_date, cfg.end_date);
}

#[test]
fn build_app_config_sample_seed_override() {
    let mut map = HashMap::new();
    map.insert("CLIMSENT_SAMPLE_SEED", "7");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.sample_seed, 7);
}

#[test]
fn build_app_config_sample_seed_invalid() {
    let mut map = HashMap::new();
    map.insert("CLIMSENT_SAMPLE_SEED", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CLIMSENT_SAMPLE_SEED"),
        "expected InvalidEnvVar(CLIMSENT_SAMPLE_SEED), got: {result:?}"
    );
}

#[test]
fn build_app_config_max_scatter_points_override() {
    let mut map = HashMap::new();
    map.insert("CLIMSENT_MAX_SCATTER_POINTS", "500");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_scatter_points, 500);
}

#[test]
fn build_app_config_max_scatter_points_zero_rejected() {
    let mut map = HashMap::new();
    map.insert("CLIMSENT_MAX_SCATTER_POINTS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CLIMSENT_MAX_SCATTER_POINTS"),
        "expected InvalidEnvVar(CLIMSENT_MAX_SCATTER_POINTS), got: {result:?}"
    );
}

#[test]
fn build_app_config_top_topics_invalid() {
    let mut map = HashMap::new();
    map.insert("CLIMSENT_TOP_TOPICS", "five");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CLIMSENT_TOP_TOPICS"),
        "expected InvalidEnvVar(CLIMSENT_TOP_TOPICS), got: {result:?}"
    );
}
