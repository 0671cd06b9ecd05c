//! Weekly mean sentiment for the most discussed topics.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;

use crate::timestamp::{parse_timestamp, week_start};
use crate::types::ClimateRecord;

/// Mean sentiment for one topic in one week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyTopicSentiment {
    /// Monday of the week.
    pub week: NaiveDate,
    pub topic: String,
    pub mean: f64,
    pub count: usize,
}

struct TopicRow {
    week: NaiveDate,
    topic: String,
    sentiment: f64,
}

fn usable_rows(records: &[ClimateRecord]) -> Vec<TopicRow> {
    records
        .iter()
        .filter_map(|r| {
            let instant = r.created_at.as_deref().and_then(parse_timestamp)?;
            let topic = r.topic.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
            let sentiment = r.sentiment.filter(|s| s.is_finite())?;
            Some(TopicRow {
                week: week_start(instant.date()),
                topic: topic.to_string(),
                sentiment,
            })
        })
        .collect()
}

/// The `n` topics with the most rows, most frequent first. Ties go to the
/// alphabetically earlier topic.
#[must_use]
pub fn top_topics(records: &[ClimateRecord], n: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in usable_rows(records) {
        *counts.entry(row.topic).or_default() += 1;
    }
    rank_topics(counts, n)
}

fn rank_topics(counts: HashMap<String, usize>, n: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}

/// Weekly mean sentiment for each of the `top_n` most frequent topics.
///
/// Rows need a parseable timestamp, a numeric sentiment, and a non-blank
/// topic. Output is ordered by week, then topic.
#[must_use]
pub fn weekly_topic_sentiment(
    records: &[ClimateRecord],
    top_n: usize,
) -> Vec<WeeklyTopicSentiment> {
    let rows = usable_rows(records);

    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in &rows {
        *counts.entry(row.topic.clone()).or_default() += 1;
    }
    let keep: HashSet<String> = rank_topics(counts, top_n)
        .into_iter()
        .map(|(topic, _)| topic)
        .collect();

    let mut buckets: BTreeMap<(NaiveDate, String), (f64, usize)> = BTreeMap::new();
    for row in rows.into_iter().filter(|r| keep.contains(&r.topic)) {
        let entry = buckets.entry((row.week, row.topic)).or_insert((0.0, 0));
        entry.0 += row.sentiment;
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .map(|((week, topic), (sum, count))| {
            #[allow(clippy::cast_precision_loss)]
            let mean = sum / count as f64;
            WeeklyTopicSentiment {
                week,
                topic,
                mean,
                count,
            }
        })
        .collect()
}
