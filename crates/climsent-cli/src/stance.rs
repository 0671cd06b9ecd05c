//! `stance` and `scatter` commands.

use std::path::Path;

use climsent_sentiment::{stance_distribution, stratified_sample, CsvEventSource, Sampling};

/// Print the per-stance sentiment distribution.
///
/// # Errors
///
/// Returns an error if the dataset cannot be read or lacks the `sentiment`
/// or `stance` column.
pub(crate) fn run_stance(input: &Path) -> anyhow::Result<()> {
    let records = CsvEventSource::new(input).load_records(&Sampling::Full, &["sentiment", "stance"])?;
    let summaries = stance_distribution(&records);

    if summaries.is_empty() {
        println!("no rows with both sentiment and stance in {}", input.display());
        return Ok(());
    }

    println!(
        "{:<15}{:>8}{:>9}{:>9}{:>9}{:>9}{:>9}{:>9}",
        "STANCE", "COUNT", "MIN", "Q1", "MEDIAN", "Q3", "MAX", "MEAN"
    );
    for s in &summaries {
        println!(
            "{:<15}{:>8}{:>9.3}{:>9.3}{:>9.3}{:>9.3}{:>9.3}{:>9.3}",
            s.stance, s.count, s.min, s.q1, s.median, s.q3, s.max, s.mean
        );
    }
    Ok(())
}

/// Print sample sizes and trend lines for temperature vs. sentiment.
///
/// # Errors
///
/// Returns an error if the dataset cannot be read or lacks a required column.
pub(crate) fn run_scatter(input: &Path, max_points: usize, seed: u64) -> anyhow::Result<()> {
    let records = CsvEventSource::new(input).load_records(
        &Sampling::Full,
        &["sentiment", "stance", "temperature_avg"],
    )?;
    let samples = stratified_sample(&records, max_points, seed);

    if samples.is_empty() {
        println!(
            "no rows with sentiment, stance and temperature in {}",
            input.display()
        );
        return Ok(());
    }

    println!("{:<15}{:>10}{:>10}  TREND", "STANCE", "SAMPLED", "OF");
    for sample in &samples {
        let trend = sample.trend.map_or_else(
            || "\u{2014}".to_string(),
            |fit| format!("sentiment = {:.4} * temp {:+.4}", fit.slope, fit.intercept),
        );
        println!(
            "{:<15}{:>10}{:>10}  {}",
            sample.stance,
            sample.points.len(),
            sample.population,
            trend
        );
    }
    Ok(())
}
