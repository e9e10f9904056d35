//! Calendar-bucket aggregation of dated records.

use chrono::NaiveDate;
use reports_core::calendar::{CalendarBucket, Period};
use reports_core::models::{LedgerEntry, SessionRecord};
use reports_core::series::AggregatedSeries;

/// Stateless helper that sums dated values into calendar buckets.
pub struct TimeSeriesAggregator;

impl TimeSeriesAggregator {
    /// Group `records` by the `period` bucket of `date_of` and sum `value_of`.
    ///
    /// The result is sparse: a bucket appears only if some record fell in it.
    pub fn aggregate_by<T, D, V>(
        records: &[T],
        period: Period,
        date_of: D,
        value_of: V,
    ) -> AggregatedSeries
    where
        D: Fn(&T) -> NaiveDate,
        V: Fn(&T) -> f64,
    {
        let mut series = AggregatedSeries::new(period);
        for record in records {
            series.accumulate(CalendarBucket::for_date(date_of(record), period), value_of(record));
        }
        series
    }

    /// Session hours per bucket.
    pub fn aggregate_sessions(records: &[SessionRecord], period: Period) -> AggregatedSeries {
        Self::aggregate_by(records, period, |r| r.date, |r| r.duration_hours)
    }

    /// Ledger amounts per bucket.
    pub fn aggregate_ledger(entries: &[LedgerEntry], period: Period) -> AggregatedSeries {
        Self::aggregate_by(entries, period, |e| e.date, |e| e.amount)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
