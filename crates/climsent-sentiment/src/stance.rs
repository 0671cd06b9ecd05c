//! Sentiment broken down by author stance.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::types::ClimateRecord;

/// Distribution of sentiment scores for one stance.
#[derive(Debug, Clone, PartialEq)]
pub struct StanceSummary {
    pub stance: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

/// One (temperature, sentiment) observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StancePoint {
    pub temperature: f64,
    pub sentiment: f64,
}

/// Least-squares line `sentiment = slope * temperature + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    #[must_use]
    pub fn predict(&self, temperature: f64) -> f64 {
        self.slope * temperature + self.intercept
    }
}

/// Sampled points for one stance plus the trend through them.
#[derive(Debug, Clone, PartialEq)]
pub struct StanceSample {
    pub stance: String,
    /// Rows available for this stance before sampling.
    pub population: usize,
    pub points: Vec<StancePoint>,
    pub trend: Option<LinearFit>,
}

/// Uppercase the first character and lowercase the rest, so `BELIEVER`,
/// `believer` and `Believer` group together.
#[must_use]
pub fn capitalize_stance(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn stance_of(record: &ClimateRecord) -> Option<String> {
    record
        .stance
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(capitalize_stance)
}

/// Per-stance five-number summary and mean of sentiment.
///
/// Rows missing either sentiment or stance are ignored. Output is sorted by
/// stance name.
#[must_use]
pub fn stance_distribution(records: &[ClimateRecord]) -> Vec<StanceSummary> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in records {
        let (Some(stance), Some(score)) = (stance_of(record), record.sentiment) else {
            continue;
        };
        if score.is_finite() {
            groups.entry(stance).or_default().push(score);
        }
    }

    groups
        .into_iter()
        .map(|(stance, mut scores)| {
            scores.sort_by(f64::total_cmp);
            #[allow(clippy::cast_precision_loss)]
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            StanceSummary {
                count: scores.len(),
                min: scores[0],
                q1: quantile(&scores, 0.25),
                median: quantile(&scores, 0.5),
                q3: quantile(&scores, 0.75),
                max: scores[scores.len() - 1],
                mean,
                stance,
            }
        })
        .collect()
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Draw a bounded, per-stance sample of (temperature, sentiment) points and
/// fit a trend line to each.
///
/// Every stance gets a quota of `ceil(max_total_points / stances)` and keeps
/// `min(quota, population)` rows chosen without replacement. Each group is
/// sampled with a fresh RNG seeded from `seed`, so adding a stance does not
/// change the other groups' samples.
#[must_use]
pub fn stratified_sample(
    records: &[ClimateRecord],
    max_total_points: usize,
    seed: u64,
) -> Vec<StanceSample> {
    let mut groups: BTreeMap<String, Vec<StancePoint>> = BTreeMap::new();
    for record in records {
        let (Some(stance), Some(sentiment), Some(temperature)) =
            (stance_of(record), record.sentiment, record.temperature_avg)
        else {
            continue;
        };
        if sentiment.is_finite() && temperature.is_finite() {
            groups.entry(stance).or_default().push(StancePoint {
                temperature,
                sentiment,
            });
        }
    }

    if groups.is_empty() {
        return Vec::new();
    }
    let quota = max_total_points.div_ceil(groups.len());

    groups
        .into_iter()
        .map(|(stance, points)| {
            let population = points.len();
            let points = if population > quota {
                let mut rng = StdRng::seed_from_u64(seed);
                rand::seq::index::sample(&mut rng, population, quota)
                    .into_iter()
                    .map(|i| points[i])
                    .collect()
            } else {
                points
            };
            let trend = fit_linear(&points);
            StanceSample {
                stance,
                population,
                points,
                trend,
            }
        })
        .collect()
}

/// Ordinary least squares of sentiment on temperature.
///
/// `None` with fewer than two points or when every temperature is identical.
#[must_use]
pub fn fit_linear(points: &[StancePoint]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.temperature).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.sentiment).sum::<f64>() / n;

    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), p| {
        let dx = p.temperature - mean_x;
        (sxy + dx * (p.sentiment - mean_y), sxx + dx * dx)
    });
    if sxx <= f64::EPSILON {
        return None;
    }

    let slope = sxy / sxx;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}
