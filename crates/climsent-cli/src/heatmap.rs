//! `heatmap` command: monthly sentiment counts through the cache gate.

use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::NaiveDate;
use climsent_sentiment::{
    load_or_compute, AggregateMatrix, AggregationParams, CachePolicy, CsvEventSource, DateRange,
    Sampling,
};

/// Fully resolved `heatmap` options (CLI flags over config defaults).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeatmapArgs {
    pub input: PathBuf,
    pub cache: PathBuf,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub sampling: Sampling,
    pub cache_policy: CachePolicy,
}

/// `--nrows` alone reads the leading rows; with `--sample-random` it draws a
/// seeded sample. The parser only accepts `--sample-random` alongside
/// `--nrows`.
pub(crate) fn resolve_sampling(nrows: Option<usize>, sample_random: bool, seed: u64) -> Sampling {
    match (nrows, sample_random) {
        (None, _) => Sampling::Full,
        (Some(rows), false) => Sampling::Head { rows },
        (Some(rows), true) => Sampling::Random { rows, seed },
    }
}

pub(crate) fn resolve_cache_policy(force_recompute: bool, no_cache: bool) -> CachePolicy {
    if no_cache {
        CachePolicy::Bypass
    } else if force_recompute {
        CachePolicy::ForceRecompute
    } else {
        CachePolicy::Use
    }
}

/// Compute (or load) the monthly matrix and print it.
///
/// # Errors
///
/// Returns an error if the range is inverted, the dataset cannot be read, no
/// row has a valid timestamp, or a matching cache artifact is corrupt.
pub(crate) fn run_heatmap(args: &HeatmapArgs) -> anyhow::Result<()> {
    let range = DateRange::new(args.start, args.end)?;
    let params = AggregationParams {
        range,
        sampling: args.sampling,
        cache_policy: args.cache_policy,
    };
    let source = CsvEventSource::new(&args.input);

    let matrix = load_or_compute(&source, &args.cache, &params)?;

    print!("{}", format_matrix(&matrix));
    println!(
        "{} tweets across {} months ({} to {})",
        matrix.total(),
        matrix.months().len(),
        args.start,
        args.end
    );
    Ok(())
}

/// One line per month: the three category counts and the month total.
pub(crate) fn format_matrix(matrix: &AggregateMatrix) -> String {
    let view = matrix.heatmap_view();
    let mut out = String::new();

    let _ = write!(out, "{:<10}", view.x_label.to_uppercase());
    for category in matrix.categories() {
        let _ = write!(out, "{:>10}", category.label().to_uppercase());
    }
    let _ = writeln!(out, "{:>10}", "TOTAL");

    for (col, month) in matrix.months().iter().enumerate() {
        let _ = write!(out, "{:<10}", month.format("%Y-%m").to_string());
        for category in matrix.categories() {
            let _ = write!(out, "{:>10}", matrix.row(category)[col]);
        }
        let _ = writeln!(out, "{:>10}", view.monthly_totals[col]);
    }
    out
}
