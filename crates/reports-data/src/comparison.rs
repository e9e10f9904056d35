//! Session hours joined with modem credit, rated per hour.

use reports_core::calculations::RateCalculator;
use reports_core::calendar::CalendarBucket;
use reports_core::series::AggregatedSeries;

/// One bucket of the hours / credit comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub bucket: CalendarBucket,
    pub session_hours: f64,
    pub modem_credit: f64,
    /// `None` when `session_hours` is fractional.
    pub rate_per_hour: Option<i64>,
    pub cumulative_hours: f64,
    pub cumulative_credit: f64,
    /// Same policy as `rate_per_hour`, over the cumulative pair.
    pub cumulative_rate: Option<i64>,
}

/// Left-joins credit onto hours and derives the rate columns.
pub struct ComparisonJoiner;

impl ComparisonJoiner {
    /// One row per bucket from the first to the last bucket of `hours`,
    /// ascending.
    ///
    /// Buckets inside that span with no hours take zero hours, so their credit
    /// still reaches the cumulative columns. Buckets with no credit take a
    /// credit of zero. Credit outside the hours span is dropped. Neither input
    /// is modified.
    pub fn join(hours: &AggregatedSeries, credit: &AggregatedSeries) -> Vec<ComparisonRow> {
        let mut cumulative_hours = 0.0;
        let mut cumulative_credit = 0.0;

        span(hours)
            .into_iter()
            .map(|bucket| {
                let session_hours = hours.get(&bucket).unwrap_or(0.0);
                let modem_credit = credit.get(&bucket).unwrap_or(0.0);
                cumulative_hours += session_hours;
                cumulative_credit += modem_credit;
                ComparisonRow {
                    bucket,
                    session_hours,
                    modem_credit,
                    rate_per_hour: RateCalculator::rate_per_hour(modem_credit, session_hours),
                    cumulative_hours,
                    cumulative_credit,
                    cumulative_rate: RateCalculator::rate_per_hour(
                        cumulative_credit,
                        cumulative_hours,
                    ),
                }
            })
            .collect()
    }
}

/// Every bucket from the first to the last of `series`, gaps included.
fn span(series: &AggregatedSeries) -> Vec<CalendarBucket> {
    let (Some(first), Some(last)) = (series.buckets().next(), series.buckets().last()) else {
        return Vec::new();
    };
    let mut buckets = vec![first];
    let mut current = first;
    while current < last {
        match current.next() {
            Some(next) => {
                buckets.push(next);
                current = next;
            }
            None => break,
        }
    }
    buckets
}

// ── Tests ─────────────────────────────────────────────────────────────────────
