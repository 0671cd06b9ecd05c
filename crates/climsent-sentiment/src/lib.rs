//! Climate tweet sentiment analyses.
//!
//! Loads the tweet dataset from CSV, buckets sentiment scores into
//! Negative/Neutral/Positive, and counts them per calendar month over a
//! configured window. The monthly matrix is memoized on disk behind a cache
//! key derived from the dataset identity and the aggregation parameters.
//! Stance and topic summaries reuse the same loader.

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod matrix;
pub mod pipeline;
pub mod scorer;
pub mod source;
pub mod stance;
pub mod timestamp;
pub mod topics;
pub mod types;

pub use aggregate::{aggregate, aggregate_with_report, classify_event, OutcomeTally, RowOutcome};
pub use cache::CacheKey;
pub use error::SentimentError;
pub use matrix::{AggregateMatrix, HeatmapView};
pub use pipeline::{load_or_compute, AggregationParams, CachePolicy};
pub use scorer::categorize;
pub use source::{CsvEventSource, EventSource};
pub use stance::{stance_distribution, stratified_sample, LinearFit, StanceSample, StanceSummary};
pub use topics::{weekly_topic_sentiment, WeeklyTopicSentiment};
pub use types::{ClimateRecord, DateRange, Event, Sampling, SentimentCategory};
