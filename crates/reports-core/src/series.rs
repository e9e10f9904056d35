//! Calendar-indexed series shared by the aggregation, pivot and join stages.
//!
//! Two shapes are kept deliberately distinct:
//!
//! * [`AggregatedSeries`] is *sparse*: a bucket exists only when at least one
//!   record contributed to it.
//! * [`PivotTable`] is *dense* across its columns: every row has a cell for
//!   every category, with explicit zeros where nothing contributed.

use std::collections::BTreeMap;

use crate::calendar::{CalendarBucket, Period};

// ── AggregatedSeries ──────────────────────────────────────────────────────────

/// Bucket → numeric total (hours or currency), ordered by bucket ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSeries {
    period: Period,
    totals: BTreeMap<CalendarBucket, f64>,
}

impl AggregatedSeries {
    pub fn new(period: Period) -> Self {
        Self {
            period,
            totals: BTreeMap::new(),
        }
    }

    /// Add `value` into `bucket`, creating the bucket on first contribution.
    pub fn accumulate(&mut self, bucket: CalendarBucket, value: f64) {
        *self.totals.entry(bucket).or_insert(0.0) += value;
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn get(&self, bucket: &CalendarBucket) -> Option<f64> {
        self.totals.get(bucket).copied()
    }

    /// `(bucket, total)` pairs in ascending bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (CalendarBucket, f64)> + '_ {
        self.totals.iter().map(|(bucket, total)| (*bucket, *total))
    }

    pub fn buckets(&self) -> impl Iterator<Item = CalendarBucket> + '_ {
        self.totals.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Sum of every bucket total.
    pub fn total(&self) -> f64 {
        self.totals.values().sum()
    }
}

// ── PivotTable ────────────────────────────────────────────────────────────────

/// One row per bucket, one column per category, zero-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    period: Period,
    categories: Vec<String>,
    rows: BTreeMap<CalendarBucket, Vec<f64>>,
}

impl PivotTable {
    /// Create an empty table whose column order is `categories` as given.
    pub fn new(period: Period, categories: Vec<String>) -> Self {
        Self {
            period,
            categories,
            rows: BTreeMap::new(),
        }
    }

    /// Add `value` into the `(bucket, category)` cell.
    ///
    /// A new row is zero-filled across all columns before the value lands.
    /// Returns `false` (and changes nothing) when `category` is not a column.
    pub fn accumulate(&mut self, bucket: CalendarBucket, category: &str, value: f64) -> bool {
        let Some(column) = self.column_index(category) else {
            return false;
        };
        let width = self.categories.len();
        let row = self.rows.entry(bucket).or_insert_with(|| vec![0.0; width]);
        row[column] += value;
        true
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// `(bucket, cells)` pairs in ascending bucket order; cells follow
    /// [`PivotTable::categories`].
    pub fn rows(&self) -> impl Iterator<Item = (CalendarBucket, &[f64])> + '_ {
        self.rows
            .iter()
            .map(|(bucket, cells)| (*bucket, cells.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of one cell; `None` when the row or column does not exist.
    pub fn cell(&self, bucket: &CalendarBucket, category: &str) -> Option<f64> {
        let column = self.column_index(category)?;
        self.rows.get(bucket).map(|cells| cells[column])
    }

    /// Sum across all columns of one row.
    pub fn row_total(&self, bucket: &CalendarBucket) -> f64 {
        self.rows
            .get(bucket)
            .map(|cells| cells.iter().sum())
            .unwrap_or(0.0)
    }

    /// Sum down one column.
    pub fn column_total(&self, category: &str) -> f64 {
        match self.column_index(category) {
            Some(column) => self.rows.values().map(|cells| cells[column]).sum(),
            None => 0.0,
        }
    }

    fn column_index(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
