//! Cache-gated monthly aggregation.

use std::path::Path;

use chrono::Utc;

use crate::aggregate::aggregate_with_report;
use crate::cache::{self, CacheKey, CacheMetadata};
use crate::error::SentimentError;
use crate::matrix::AggregateMatrix;
use crate::source::EventSource;
use crate::types::{DateRange, Sampling};

/// How [`load_or_compute`] treats the on-disk artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Read the artifact when its key matches, otherwise compute and overwrite it.
    #[default]
    Use,
    /// Ignore any artifact (even a corrupt one), compute, and overwrite it.
    ForceRecompute,
    /// Compute without reading or writing the artifact.
    Bypass,
}

/// Inputs to one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationParams {
    pub range: DateRange,
    pub sampling: Sampling,
    pub cache_policy: CachePolicy,
}

impl AggregationParams {
    /// Full dataset over `range`, cache enabled.
    #[must_use]
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            sampling: Sampling::Full,
            cache_policy: CachePolicy::Use,
        }
    }
}

/// Produce the monthly matrix for `params`, reusing the artifact at
/// `cache_path` when it was computed from the same source and parameters.
///
/// 1. Derive the [`CacheKey`] from the source identity, range, and sampling.
/// 2. If the sidecar key matches, read the cached CSV and return it.
/// 3. Otherwise load events, aggregate, and persist the result.
///
/// A cache hit never calls [`EventSource::load_events`]. Only
/// [`Sampling::Full`] runs read or write the artifact; sampled runs are
/// computed as under [`CachePolicy::Bypass`].
///
/// # Errors
///
/// Returns [`SentimentError::CacheCorruption`] if a matching artifact cannot
/// be parsed or covers different months (unless the policy is [`CachePolicy::ForceRecompute`]), and
/// [`SentimentError::EmptyResult`] if no event has a valid timestamp, in which
/// case nothing is written.
pub fn load_or_compute<S>(
    source: &S,
    cache_path: &Path,
    params: &AggregationParams,
) -> Result<AggregateMatrix, SentimentError>
where
    S: EventSource + ?Sized,
{
    if params.cache_policy == CachePolicy::Bypass {
        return compute(source, params);
    }
    if params.sampling != Sampling::Full {
        tracing::debug!(sampling = %params.sampling, "sampled run; cache not consulted");
        return compute(source, params);
    }

    let key = CacheKey::derive(&source.identity()?, &params.range, &params.sampling);

    if params.cache_policy == CachePolicy::Use {
        if let Some(matrix) = try_cached(cache_path, &key, &params.range)? {
            return Ok(matrix);
        }
    }

    let matrix = compute(source, params)?;
    let metadata = CacheMetadata {
        key,
        range: params.range,
        sampling: params.sampling,
        written_at: Utc::now(),
    };
    cache::store(cache_path, &matrix, &metadata)?;
    Ok(matrix)
}

fn try_cached(
    cache_path: &Path,
    key: &CacheKey,
    range: &DateRange,
) -> Result<Option<AggregateMatrix>, SentimentError> {
    let Some(metadata) = cache::load_metadata(cache_path)? else {
        if cache_path.exists() {
            tracing::warn!(
                path = %cache_path.display(),
                "cache file has no metadata sidecar; recomputing"
            );
        }
        return Ok(None);
    };

    if metadata.key != *key {
        tracing::info!(
            path = %cache_path.display(),
            cached_key = %metadata.key,
            wanted_key = %key,
            "cache key mismatch; recomputing"
        );
        return Ok(None);
    }

    if !cache_path.exists() {
        tracing::warn!(
            path = %cache_path.display(),
            "cache metadata present but matrix file missing; recomputing"
        );
        return Ok(None);
    }

    let matrix = cache::load_matrix(cache_path)?;
    let expected = range.months();
    if matrix.months() != expected.as_slice() {
        return Err(SentimentError::CacheCorruption {
            path: cache_path.display().to_string(),
            reason: format!(
                "matrix covers {} months but the key's range has {}",
                matrix.months().len(),
                expected.len()
            ),
        });
    }
    tracing::info!(
        path = %cache_path.display(),
        months = matrix.months().len(),
        "loaded monthly sentiment matrix from cache"
    );
    Ok(Some(matrix))
}

fn compute<S>(source: &S, params: &AggregationParams) -> Result<AggregateMatrix, SentimentError>
where
    S: EventSource + ?Sized,
{
    tracing::info!(
        start = %params.range.start(),
        end = %params.range.end(),
        sampling = %params.sampling,
        "computing monthly sentiment counts from dataset"
    );
    let events = source.load_events(&params.sampling)?;
    let (matrix, tally) = aggregate_with_report(&events, &params.range)?;
    tracing::info!(
        events = events.len(),
        included = tally.included,
        parse_failures = tally.parse_failures,
        out_of_range = tally.out_of_range,
        "monthly sentiment counts computed"
    );
    Ok(matrix)
}
