//! Fixed-threshold sentiment categorization.

use crate::types::SentimentCategory;

/// Scores strictly below this are [`SentimentCategory::Negative`].
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Scores strictly above this are [`SentimentCategory::Positive`].
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Bucket a continuous sentiment score.
///
/// The thresholds themselves are Neutral. Total over finite scores; callers
/// drop non-finite scores before they get here.
#[must_use]
pub fn categorize(score: f64) -> SentimentCategory {
    if score < NEGATIVE_THRESHOLD {
        SentimentCategory::Negative
    } else if score > POSITIVE_THRESHOLD {
        SentimentCategory::Positive
    } else {
        SentimentCategory::Neutral
    }
}
