//! Monthly sentiment aggregation.

use chrono::NaiveDate;

use crate::error::SentimentError;
use crate::matrix::AggregateMatrix;
use crate::scorer::categorize;
use crate::timestamp::{month_start, parse_timestamp};
use crate::types::{DateRange, Event, SentimentCategory};

/// What happened to one event during aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Included {
        category: SentimentCategory,
        month: NaiveDate,
    },
    /// The timestamp was missing or could not be parsed.
    ExcludedParseFailure,
    /// The timestamp parsed but fell outside the date range.
    ExcludedOutOfRange,
}

/// Per-outcome event counts for one aggregation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeTally {
    pub included: usize,
    pub parse_failures: usize,
    pub out_of_range: usize,
}

impl OutcomeTally {
    #[must_use]
    pub fn total(&self) -> usize {
        self.included + self.parse_failures + self.out_of_range
    }

    fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Included { .. } => self.included += 1,
            RowOutcome::ExcludedParseFailure => self.parse_failures += 1,
            RowOutcome::ExcludedOutOfRange => self.out_of_range += 1,
        }
    }
}

/// Classify one event against `range`.
///
/// Category and month are derived before the range check; the check itself
/// uses the full instant, not the truncated month.
#[must_use]
pub fn classify_event(event: &Event, range: &DateRange) -> RowOutcome {
    let Some(instant) = event.created_at.as_deref().and_then(parse_timestamp) else {
        return RowOutcome::ExcludedParseFailure;
    };

    let category = categorize(event.sentiment);
    let month = month_start(instant.date());

    if !range.contains(instant) {
        return RowOutcome::ExcludedOutOfRange;
    }

    RowOutcome::Included { category, month }
}

/// Count events per (category, month) over every month of `range`.
///
/// # Errors
///
/// Returns [`SentimentError::EmptyResult`] when no event has a parseable
/// timestamp. Events that parse but all fall outside the range produce an
/// all-zero matrix instead.
pub fn aggregate(events: &[Event], range: &DateRange) -> Result<AggregateMatrix, SentimentError> {
    aggregate_with_report(events, range).map(|(matrix, _)| matrix)
}

/// Like [`aggregate`], also returning how many events each outcome claimed.
///
/// # Errors
///
/// Same as [`aggregate`].
pub fn aggregate_with_report(
    events: &[Event],
    range: &DateRange,
) -> Result<(AggregateMatrix, OutcomeTally), SentimentError> {
    let outcomes: Vec<RowOutcome> = events.iter().map(|e| classify_event(e, range)).collect();

    if outcomes
        .iter()
        .all(|o| matches!(o, RowOutcome::ExcludedParseFailure))
    {
        tracing::debug!(
            events = events.len(),
            "every event failed timestamp parsing"
        );
        return Err(SentimentError::EmptyResult);
    }

    let mut matrix = AggregateMatrix::zeroed(range.months());
    let mut tally = OutcomeTally::default();

    for outcome in outcomes {
        if let RowOutcome::Included { category, month } = outcome {
            // Only fails if the month axis and the range disagree.
            if !matrix.increment(category, month) {
                tally.record(RowOutcome::ExcludedOutOfRange);
                continue;
            }
        }
        tally.record(outcome);
    }

    tracing::debug!(
        included = tally.included,
        parse_failures = tally.parse_failures,
        out_of_range = tally.out_of_range,
        months = matrix.months().len(),
        "aggregated events into monthly matrix"
    );

    Ok((matrix, tally))
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
