//! Calendar period keys used to group, pivot and join time series.
//!
//! Buckets follow calendar boundaries: a monthly bucket covers the first to
//! the last day of its month, a yearly bucket 1 January to 31 December. Each
//! bucket is labelled by its period end, the same convention financial
//! resampling uses.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ── Period ────────────────────────────────────────────────────────────────────

/// Granularity used when bucketing records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Monthly,
    Yearly,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── CalendarBucket ────────────────────────────────────────────────────────────

/// A year-month or year grouping key.
///
/// Ordering is chronological within one granularity. Series never mix the two
/// variants, so the cross-variant order carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CalendarBucket {
    Year(i32),
    Month { year: i32, month: u32 },
}

impl CalendarBucket {
    /// The bucket of `period` granularity that contains `date`.
    pub fn for_date(date: NaiveDate, period: Period) -> Self {
        match period {
            Period::Monthly => CalendarBucket::Month {
                year: date.year(),
                month: date.month(),
            },
            Period::Yearly => CalendarBucket::Year(date.year()),
        }
    }

    pub fn period(&self) -> Period {
        match self {
            CalendarBucket::Year(_) => Period::Yearly,
            CalendarBucket::Month { .. } => Period::Monthly,
        }
    }

    /// First calendar day covered by the bucket.
    pub fn start_date(&self) -> Option<NaiveDate> {
        match *self {
            CalendarBucket::Year(year) => NaiveDate::from_ymd_opt(year, 1, 1),
            CalendarBucket::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
        }
    }

    /// Last calendar day covered by the bucket (the bucket's label date).
    pub fn end_date(&self) -> Option<NaiveDate> {
        match *self {
            CalendarBucket::Year(year) => NaiveDate::from_ymd_opt(year, 12, 31),
            CalendarBucket::Month { year, month } => {
                let (next_year, next_month) = if month == 12 {
                    (year + 1, 1)
                } else {
                    (year, month + 1)
                };
                NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
            }
        }
    }

    /// The bucket of the same granularity that follows this one.
    pub fn next(&self) -> Option<Self> {
        let following = self.end_date()?.succ_opt()?;
        Some(CalendarBucket::for_date(following, self.period()))
    }

    /// Human-readable label, e.g. `"January 2024"` or `"2024"`.
    pub fn label(&self) -> String {
        match self {
            CalendarBucket::Year(year) => year.to_string(),
            CalendarBucket::Month { .. } => match self.start_date() {
                Some(date) => date.format("%B %Y").to_string(),
                None => self.to_string(),
            },
        }
    }
}

impl fmt::Display for CalendarBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarBucket::Year(year) => write!(f, "{:04}", year),
            CalendarBucket::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
