use chrono::{Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::SentimentError;
use crate::timestamp::month_start;

/// Discrete sentiment bucket derived from a continuous score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SentimentCategory {
    Negative,
    Neutral,
    Positive,
}

impl SentimentCategory {
    /// Every category in matrix row order.
    pub const ALL: [SentimentCategory; 3] = [
        SentimentCategory::Negative,
        SentimentCategory::Neutral,
        SentimentCategory::Positive,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SentimentCategory::Negative => "Negative",
            SentimentCategory::Neutral => "Neutral",
            SentimentCategory::Positive => "Positive",
        }
    }

    /// Inverse of [`label`](Self::label). Exact, case-sensitive match.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Row index of this category in an [`AggregateMatrix`](crate::AggregateMatrix).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            SentimentCategory::Negative => 0,
            SentimentCategory::Neutral => 1,
            SentimentCategory::Positive => 2,
        }
    }
}

impl std::fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the tweet dataset.
///
/// Every column is optional so one loader serves all analyses. Numeric cells
/// that fail to parse come through as `None` rather than failing the row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClimateRecord {
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub sentiment: Option<f64>,
    #[serde(default)]
    pub stance: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub temperature_avg: Option<f64>,
}

/// A timestamped sentiment observation fed to the monthly aggregator.
///
/// The timestamp is kept as raw text; parsing happens during aggregation so
/// unparseable rows show up as explicit exclusions.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub created_at: Option<String>,
    pub sentiment: f64,
}

impl Event {
    pub fn new(created_at: impl Into<String>, sentiment: f64) -> Self {
        Self {
            created_at: Some(created_at.into()),
            sentiment,
        }
    }

    /// Build an event from a dataset row. Rows without a finite sentiment
    /// score yield `None`.
    #[must_use]
    pub fn from_record(record: &ClimateRecord) -> Option<Self> {
        let sentiment = record.sentiment.filter(|s| s.is_finite())?;
        Some(Self {
            created_at: record.created_at.clone(),
            sentiment,
        })
    }
}

/// How many dataset rows to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Sampling {
    /// Every row in the file.
    #[default]
    Full,
    /// The first `rows` data rows.
    Head { rows: usize },
    /// A uniform sample of `rows` rows without replacement, reproducible for a given seed.
    Random { rows: usize, seed: u64 },
}

impl std::fmt::Display for Sampling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sampling::Full => write!(f, "full"),
            Sampling::Head { rows } => write!(f, "head:{rows}"),
            Sampling::Random { rows, seed } => write!(f, "random:{rows}:{seed}"),
        }
    }
}

/// Inclusive calendar-date window for aggregation.
///
/// An instant is in range when its date lies between `start` and `end`, so the
/// whole of the end day counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`SentimentError::InvalidRange`] when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SentimentError> {
        if start > end {
            return Err(SentimentError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        let date = instant.date();
        date >= self.start && date <= self.end
    }

    /// First-of-month dates from the month of `start` through the month of
    /// `end`, ascending and gap-free.
    #[must_use]
    pub fn months(&self) -> Vec<NaiveDate> {
        let last = month_start(self.end);
        let mut months = Vec::new();
        let mut current = Some(month_start(self.start));
        while let Some(month) = current.filter(|m| *m <= last) {
            months.push(month);
            current = month.checked_add_months(Months::new(1));
        }
        months
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn category_labels_round_trip() {
        for category in SentimentCategory::ALL {
            assert_eq!(SentimentCategory::from_label(category.label()), Some(category));
        }
        assert_eq!(SentimentCategory::from_label("negative"), None);
    }

    #[test]
    fn category_index_matches_all_order() {
        for (i, category) in SentimentCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        let err = DateRange::new(ymd(2011, 1, 1), ymd(2010, 1, 1)).unwrap_err();
        assert!(matches!(err, SentimentError::InvalidRange { .. }));
    }

    #[test]
    fn date_range_months_cover_default_window() {
        let range = DateRange::new(ymd(2006, 1, 1), ymd(2011, 12, 31)).unwrap();
        let months = range.months();
        assert_eq!(months.len(), 72);
        assert_eq!(months.first(), Some(&ymd(2006, 1, 1)));
        assert_eq!(months.last(), Some(&ymd(2011, 12, 1)));
    }

    #[test]
    fn date_range_months_truncate_mid_month_bounds() {
        let range = DateRange::new(ymd(2006, 1, 15), ymd(2006, 3, 2)).unwrap();
        assert_eq!(
            range.months(),
            vec![ymd(2006, 1, 1), ymd(2006, 2, 1), ymd(2006, 3, 1)]
        );
    }

    #[test]
    fn date_range_months_cross_year_boundary() {
        let range = DateRange::new(ymd(2009, 11, 1), ymd(2010, 2, 1)).unwrap();
        assert_eq!(range.months().len(), 4);
    }

    #[test]
    fn date_range_contains_whole_end_day() {
        let range = DateRange::new(ymd(2006, 1, 1), ymd(2006, 1, 31)).unwrap();
        let late = ymd(2006, 1, 31).and_hms_opt(23, 59, 59).unwrap();
        let next = ymd(2006, 2, 1).and_hms_opt(0, 0, 0).unwrap();
        let before = ymd(2005, 12, 31).and_hms_opt(23, 59, 59).unwrap();
        assert!(range.contains(late));
        assert!(!range.contains(next));
        assert!(!range.contains(before));
    }

    #[test]
    fn event_from_record_drops_missing_and_non_finite_scores() {
        let mut record = ClimateRecord {
            created_at: Some("2006-01-01".to_string()),
            sentiment: None,
            ..ClimateRecord::default()
        };
        assert!(Event::from_record(&record).is_none());

        record.sentiment = Some(f64::NAN);
        assert!(Event::from_record(&record).is_none());

        record.sentiment = Some(0.4);
        let event = Event::from_record(&record).unwrap();
        assert_eq!(event.created_at.as_deref(), Some("2006-01-01"));
    }

    #[test]
    fn sampling_display_is_distinct_per_variant() {
        assert_eq!(Sampling::Full.to_string(), "full");
        assert_eq!(Sampling::Head { rows: 10 }.to_string(), "head:10");
        assert_eq!(
            Sampling::Random { rows: 10, seed: 42 }.to_string(),
            "random:10:42"
        );
    }
}
