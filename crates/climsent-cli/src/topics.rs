//! `topics` command.

use std::io::Write;
use std::path::Path;

use climsent_sentiment::topics::top_topics;
use climsent_sentiment::{
    weekly_topic_sentiment, CsvEventSource, Sampling, WeeklyTopicSentiment,
};

/// Print weekly mean sentiment for the `top` most frequent topics as CSV.
///
/// # Errors
///
/// Returns an error if the dataset cannot be read or lacks a required column.
pub(crate) fn run_topics(input: &Path, top: usize) -> anyhow::Result<()> {
    let records = CsvEventSource::new(input).load_records(
        &Sampling::Full,
        &["created_at", "topic", "sentiment"],
    )?;

    let leaders = top_topics(&records, top);
    if leaders.is_empty() {
        println!("no rows with timestamp, topic and sentiment in {}", input.display());
        return Ok(());
    }
    for (topic, count) in &leaders {
        tracing::info!(topic = %topic, tweets = count, "top topic");
    }

    write_weekly_csv(&weekly_topic_sentiment(&records, top), std::io::stdout())?;
    Ok(())
}

/// Weekly rows as CSV: `week,topic,mean_sentiment,tweets`.
pub(crate) fn write_weekly_csv<W: Write>(
    rows: &[WeeklyTopicSentiment],
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["week", "topic", "mean_sentiment", "tweets"])?;
    for row in rows {
        wtr.write_record([
            row.week.to_string(),
            row.topic.clone(),
            format!("{:.4}", row.mean),
            row.count.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
