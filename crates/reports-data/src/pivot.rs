//! Per-team pivot of session hours.

use std::collections::BTreeSet;

use reports_core::calendar::{CalendarBucket, Period};
use reports_core::models::SessionRecord;
use reports_core::series::PivotTable;

/// Builds a [`PivotTable`] with one column per team.
pub struct CategoryPivotBuilder;

impl CategoryPivotBuilder {
    /// Distinct non-blank team names, trimmed and sorted.
    pub fn teams(records: &[SessionRecord]) -> Vec<String> {
        records
            .iter()
            .filter(|r| r.has_team())
            .map(|r| r.team.trim().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sum session hours per `(bucket, team)`.
    ///
    /// Records with a blank team are left out. Every row holds a cell for
    /// every team, zero where the team logged nothing in that bucket.
    pub fn build(records: &[SessionRecord], period: Period) -> PivotTable {
        let mut table = PivotTable::new(period, Self::teams(records));
        for record in records.iter().filter(|r| r.has_team()) {
            table.accumulate(
                CalendarBucket::for_date(record.date, period),
                record.team.trim(),
                record.duration_hours,
            );
        }
        table
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
