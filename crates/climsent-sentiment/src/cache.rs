//! On-disk memoization of the monthly matrix.
//!
//! The artifact is two files: the matrix projected to CSV at the cache path
//! (first column the category label, one column per `YYYY-MM-DD` month) and a
//! JSON sidecar at `<cache path>.meta.json` recording the [`CacheKey`] it was
//! computed under. Both are written to a temp file and renamed into place.

use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::SentimentError;
use crate::matrix::AggregateMatrix;
use crate::types::{DateRange, Sampling, SentimentCategory};

/// Header of the label column in the CSV projection.
pub const LABEL_HEADER: &str = "sentiment_label";

const MONTH_FORMAT: &str = "%Y-%m-%d";

/// Digest of every input that determines the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    #[must_use]
    pub fn derive(source_identity: &str, range: &DateRange, sampling: &Sampling) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(source_identity.as_bytes());
        hasher.update(b"\n");
        hasher.update(range.start().format(MONTH_FORMAT).to_string().as_bytes());
        hasher.update(b"\n");
        hasher.update(range.end().format(MONTH_FORMAT).to_string().as_bytes());
        hasher.update(b"\n");
        hasher.update(sampling.to_string().as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sidecar contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub key: CacheKey,
    pub range: DateRange,
    pub sampling: Sampling,
    pub written_at: DateTime<Utc>,
}

/// Path of the sidecar for a given cache path.
#[must_use]
pub fn sidecar_path(cache_path: &Path) -> PathBuf {
    let mut name = OsString::from(cache_path.as_os_str());
    name.push(".meta.json");
    PathBuf::from(name)
}

/// Serialize `matrix` in the cache projection.
///
/// # Errors
///
/// Returns [`SentimentError::Csv`] if writing fails.
pub fn write_matrix_csv<W: Write>(matrix: &AggregateMatrix, writer: W) -> Result<(), SentimentError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(matrix.months().len() + 1);
    header.push(LABEL_HEADER.to_string());
    header.extend(matrix.months().iter().map(|m| m.format(MONTH_FORMAT).to_string()));
    wtr.write_record(&header)?;

    for category in matrix.categories() {
        let mut row = Vec::with_capacity(header.len());
        row.push(category.label().to_string());
        row.extend(matrix.row(category).iter().map(ToString::to_string));
        wtr.write_record(&row)?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Parse a cache projection back into a matrix.
///
/// The label column header is not checked. Everything else is: one row per
/// category, each exactly once; month labels that are first-of-month dates,
/// ascending with no gaps; non-negative integer cells; uniform row width.
///
/// # Errors
///
/// Returns a human-readable reason when the input is not a valid projection.
pub fn read_matrix_csv<R: Read>(reader: R) -> Result<AggregateMatrix, String> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = rdr.records();

    let header = rows
        .next()
        .ok_or_else(|| "file is empty".to_string())?
        .map_err(|e| format!("unreadable header: {e}"))?;
    let months = parse_month_axis(header.iter().skip(1))?;

    let mut counts: [Option<Vec<u64>>; 3] = [None, None, None];
    for (i, record) in rows.enumerate() {
        let line = i + 2;
        let record = record.map_err(|e| format!("unreadable row at line {line}: {e}"))?;
        if record.len() != months.len() + 1 {
            return Err(format!(
                "row at line {line} has {} fields, expected {}",
                record.len(),
                months.len() + 1
            ));
        }

        let label = &record[0];
        let category = SentimentCategory::from_label(label)
            .ok_or_else(|| format!("unknown sentiment label '{label}' at line {line}"))?;
        let slot = &mut counts[category.index()];
        if slot.is_some() {
            return Err(format!("duplicate row for '{label}' at line {line}"));
        }

        let cells = record
            .iter()
            .skip(1)
            .map(|cell| {
                cell.trim()
                    .parse::<u64>()
                    .map_err(|_| format!("invalid count '{cell}' in row '{label}'"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        *slot = Some(cells);
    }

    let [negative, neutral, positive] = counts;
    let missing = |c: SentimentCategory| format!("missing row for '{c}'");
    let rows = [
        negative.ok_or_else(|| missing(SentimentCategory::Negative))?,
        neutral.ok_or_else(|| missing(SentimentCategory::Neutral))?,
        positive.ok_or_else(|| missing(SentimentCategory::Positive))?,
    ];

    Ok(AggregateMatrix::from_rows(months, rows))
}

fn parse_month_axis<'a>(labels: impl Iterator<Item = &'a str>) -> Result<Vec<NaiveDate>, String> {
    let mut months: Vec<NaiveDate> = Vec::new();
    for label in labels {
        let month = NaiveDate::parse_from_str(label.trim(), MONTH_FORMAT)
            .map_err(|_| format!("column '{label}' is not a YYYY-MM-DD date"))?;
        if month.day() != 1 {
            return Err(format!("column '{label}' is not the first of a month"));
        }
        if let Some(prev) = months.last() {
            if prev.checked_add_months(Months::new(1)) != Some(month) {
                return Err(format!("column '{label}' does not follow {prev}"));
            }
        }
        months.push(month);
    }
    if months.is_empty() {
        return Err("header has no month columns".to_string());
    }
    Ok(months)
}

/// Read the sidecar. `Ok(None)` when it does not exist.
///
/// # Errors
///
/// Returns [`SentimentError::CacheCorruption`] if the sidecar exists but is not
/// valid JSON metadata, or [`SentimentError::Io`] if it cannot be read.
pub fn load_metadata(cache_path: &Path) -> Result<Option<CacheMetadata>, SentimentError> {
    let path = sidecar_path(cache_path);
    let raw = match std::fs::read(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(SentimentError::Io {
                path: path.display().to_string(),
                source: e,
            })
        }
    };
    serde_json::from_slice(&raw)
        .map(Some)
        .map_err(|e| SentimentError::CacheCorruption {
            path: path.display().to_string(),
            reason: format!("invalid metadata: {e}"),
        })
}

/// Read the matrix stored at `cache_path`.
///
/// # Errors
///
/// Returns [`SentimentError::CacheCorruption`] when the file does not parse as
/// a projection, or [`SentimentError::Io`] when it cannot be opened.
pub fn load_matrix(cache_path: &Path) -> Result<AggregateMatrix, SentimentError> {
    let file = std::fs::File::open(cache_path).map_err(|e| SentimentError::Io {
        path: cache_path.display().to_string(),
        source: e,
    })?;
    read_matrix_csv(file).map_err(|reason| SentimentError::CacheCorruption {
        path: cache_path.display().to_string(),
        reason,
    })
}

/// Persist `matrix` and its metadata, replacing any previous artifact.
///
/// The old sidecar is removed before the CSV is replaced and the new sidecar
/// goes in last. An interrupted store therefore leaves a CSV without a
/// sidecar, which reads as a miss.
///
/// # Errors
///
/// Returns [`SentimentError::Io`], [`SentimentError::Csv`], or
/// [`SentimentError::Json`] if any write or rename fails.
pub fn store(
    cache_path: &Path,
    matrix: &AggregateMatrix,
    metadata: &CacheMetadata,
) -> Result<(), SentimentError> {
    let mut csv_bytes = Vec::new();
    write_matrix_csv(matrix, &mut csv_bytes)?;
    let json = serde_json::to_vec_pretty(metadata)?;

    let sidecar = sidecar_path(cache_path);
    remove_if_present(&sidecar)?;
    replace_file(cache_path, &csv_bytes)?;
    replace_file(&sidecar, &json)?;

    tracing::info!(
        path = %cache_path.display(),
        key = %metadata.key,
        months = matrix.months().len(),
        "monthly sentiment matrix cached"
    );
    Ok(())
}

fn remove_if_present(path: &Path) -> Result<(), SentimentError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SentimentError::Io {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

fn replace_file(path: &Path, contents: &[u8]) -> Result<(), SentimentError> {
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, contents).map_err(|e| SentimentError::Io {
        path: tmp_path.display().to_string(),
        source: e,
    })?;
    std::fs::rename(&tmp_path, path).map_err(|e| SentimentError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
