//! Sentiment-by-month count matrix.

use chrono::NaiveDate;

use crate::types::SentimentCategory;

/// Counts of events per (sentiment category, calendar month).
///
/// Rows are the three categories in [`SentimentCategory::ALL`] order; columns
/// are ascending first-of-month dates. Every cell is present, zero when no
/// event fell into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateMatrix {
    months: Vec<NaiveDate>,
    counts: [Vec<u64>; 3],
}

/// What the heatmap renderer consumes: the matrix, its per-month totals
/// (drawn as the volume line), and the axis labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatmapView<'a> {
    pub matrix: &'a AggregateMatrix,
    pub monthly_totals: Vec<u64>,
    pub x_label: &'static str,
    pub y_label: &'static str,
}

impl AggregateMatrix {
    /// All-zero matrix over the given month axis.
    #[must_use]
    pub fn zeroed(months: Vec<NaiveDate>) -> Self {
        let width = months.len();
        Self {
            months,
            counts: std::array::from_fn(|_| vec![0; width]),
        }
    }

    /// Assemble a matrix from already-validated parts. Each row must be as
    /// wide as `months`.
    pub(crate) fn from_rows(months: Vec<NaiveDate>, counts: [Vec<u64>; 3]) -> Self {
        debug_assert!(counts.iter().all(|row| row.len() == months.len()));
        Self { months, counts }
    }

    #[must_use]
    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    #[must_use]
    pub fn categories(&self) -> [SentimentCategory; 3] {
        SentimentCategory::ALL
    }

    #[must_use]
    pub fn row(&self, category: SentimentCategory) -> &[u64] {
        &self.counts[category.index()]
    }

    /// Count for one cell, or `None` when `month` is not on the axis.
    #[must_use]
    pub fn count(&self, category: SentimentCategory, month: NaiveDate) -> Option<u64> {
        let col = self.months.binary_search(&month).ok()?;
        Some(self.counts[category.index()][col])
    }

    /// Add one to a cell. Returns `false` (and changes nothing) when `month`
    /// is not on the axis.
    pub(crate) fn increment(&mut self, category: SentimentCategory, month: NaiveDate) -> bool {
        match self.months.binary_search(&month) {
            Ok(col) => {
                self.counts[category.index()][col] += 1;
                true
            }
            Err(_) => false,
        }
    }

    /// `(rows, columns)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.counts.len(), self.months.len())
    }

    /// Column sums: total events per month across all categories.
    #[must_use]
    pub fn monthly_totals(&self) -> Vec<u64> {
        (0..self.months.len())
            .map(|col| self.counts.iter().map(|row| row[col]).sum())
            .collect()
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Largest single cell, used as the colour-scale ceiling (at least 1).
    #[must_use]
    pub fn max_cell(&self) -> u64 {
        self.counts.iter().flatten().copied().max().unwrap_or(0).max(1)
    }

    #[must_use]
    pub fn heatmap_view(&self) -> HeatmapView<'_> {
        HeatmapView {
            matrix: self,
            monthly_totals: self.monthly_totals(),
            x_label: "Month",
            y_label: "Sentiment",
        }
    }
}
