//! Dataset loading.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use rand::rngs::StdRng;
use rand::SeedableRng;
use sha2::{Digest, Sha256};

use crate::error::SentimentError;
use crate::types::{ClimateRecord, Event, Sampling};

/// Columns the monthly aggregator cannot run without.
pub const EVENT_COLUMNS: &[&str] = &["created_at", "sentiment"];

/// A dataset the aggregator can pull events from.
pub trait EventSource {
    /// Stable identity of the current dataset contents, used in cache keys.
    ///
    /// Must be cheap: a cache hit calls this but never [`load_events`](Self::load_events).
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be inspected.
    fn identity(&self) -> Result<String, SentimentError>;

    /// Read events, dropping rows without a usable sentiment score.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be read or lacks a required column.
    fn load_events(&self, sampling: &Sampling) -> Result<Vec<Event>, SentimentError>;
}

/// A comma-delimited dataset file with a header row.
#[derive(Debug, Clone)]
pub struct CsvEventSource {
    path: PathBuf,
}

impl CsvEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read raw rows, checking that each of `required` is present in the header.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Io`] if the file cannot be opened,
    /// [`SentimentError::MissingColumn`] for an absent header, or
    /// [`SentimentError::Csv`] if the header row is unreadable.
    pub fn load_records(
        &self,
        sampling: &Sampling,
        required: &[&str],
    ) -> Result<Vec<ClimateRecord>, SentimentError> {
        let file = File::open(&self.path).map_err(|e| SentimentError::Io {
            path: self.path.display().to_string(),
            source: e,
        })?;
        let records = read_records(file, sampling, required)?;
        tracing::debug!(
            path = %self.path.display(),
            rows = records.len(),
            sampling = %sampling,
            "loaded dataset rows"
        );
        Ok(records)
    }
}

impl EventSource for CsvEventSource {
    fn identity(&self) -> Result<String, SentimentError> {
        let io_err = |e| SentimentError::Io {
            path: self.path.display().to_string(),
            source: e,
        };
        let meta = std::fs::metadata(&self.path).map_err(io_err)?;
        let modified = meta
            .modified()
            .map_err(io_err)?
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let canonical = std::fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());

        let input = format!("{}|{}|{}", canonical.display(), meta.len(), modified);
        Ok(format!("{:x}", Sha256::digest(input.as_bytes())))
    }

    fn load_events(&self, sampling: &Sampling) -> Result<Vec<Event>, SentimentError> {
        let records = self.load_records(sampling, EVENT_COLUMNS)?;
        Ok(events_from_records(&records))
    }
}

/// Convert rows to events, dropping rows whose sentiment is missing or non-numeric.
#[must_use]
pub fn events_from_records(records: &[ClimateRecord]) -> Vec<Event> {
    let events: Vec<Event> = records.iter().filter_map(Event::from_record).collect();
    let dropped = records.len() - events.len();
    if dropped > 0 {
        tracing::debug!(dropped, "dropped rows without a numeric sentiment score");
    }
    events
}

/// Parse dataset rows from any reader.
///
/// Rows that cannot be decoded (for example a quoted field that never closes)
/// are skipped. With [`Sampling::Head`] only the first `rows` data rows are
/// read; with [`Sampling::Random`] the whole file is read and then sampled.
///
/// # Errors
///
/// Returns [`SentimentError::MissingColumn`] if any of `required` is not a
/// header, or [`SentimentError::Csv`] if the header row cannot be read.
pub fn read_records<R: Read>(
    reader: R,
    sampling: &Sampling,
    required: &[&str],
) -> Result<Vec<ClimateRecord>, SentimentError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if let Some(missing) = required
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(SentimentError::MissingColumn((*missing).to_string()));
    }

    let limit = match sampling {
        Sampling::Head { rows } => *rows,
        Sampling::Full | Sampling::Random { .. } => usize::MAX,
    };

    let mut records = Vec::new();
    let mut skipped = 0_usize;
    for (line, result) in rdr.deserialize::<ClimateRecord>().take(limit).enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                tracing::debug!(row = line + 1, error = %e, "skipping undecodable row");
            }
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "skipped undecodable dataset rows");
    }

    if let Sampling::Random { rows, seed } = *sampling {
        records = sample_rows(records, rows, seed);
    }

    Ok(records)
}

/// Keep a uniform sample of `n` rows without replacement, in original order.
fn sample_rows<T>(rows: Vec<T>, n: usize, seed: u64) -> Vec<T> {
    if n >= rows.len() {
        if n > rows.len() {
            tracing::warn!(
                requested = n,
                available = rows.len(),
                "sample larger than dataset; keeping every row"
            );
        }
        return rows;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut keep = rand::seq::index::sample(&mut rng, rows.len(), n).into_vec();
    keep.sort_unstable();

    let mut keep = keep.into_iter().peekable();
    rows.into_iter()
        .enumerate()
        .filter_map(|(i, row)| {
            if keep.peek() == Some(&i) {
                keep.next();
                Some(row)
            } else {
                None
            }
        })
        .collect()
}
