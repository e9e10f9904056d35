//! CSV artifacts written by the pipeline.
//!
//! Every artifact is written to a `.tmp` sibling and renamed into place once
//! complete, so an interrupted run never leaves a half-written file behind.

use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};

use reports_core::error::{ReportError, Result};
use reports_core::series::{AggregatedSeries, PivotTable};
use tracing::debug;

use crate::comparison::ComparisonRow;
use crate::normalizer::NormalizedRow;
use crate::team_cost::TeamCost;

/// Write a CSV file at `path` through `write`, atomically.
///
/// Rows may have differing field counts. The temporary file is removed when
/// `write` fails.
pub fn write_csv_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut csv::Writer<File>) -> Result<()>,
{
    let tmp = tmp_path(path);
    let write_err = |source| ReportError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let file = File::create(&tmp).map_err(write_err)?;
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);

    let result = write(&mut writer).and_then(|()| writer.flush().map_err(write_err));
    drop(writer);

    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }

    std::fs::rename(&tmp, path).map_err(write_err)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Write normalized ledger rows, one CSV record per row, no header.
pub fn write_ledger_csv(rows: &[NormalizedRow], path: &Path) -> Result<()> {
    write_csv_atomic(path, |writer| {
        for row in rows.iter().filter(|r| !r.is_empty()) {
            writer.write_record(&row.fields)?;
        }
        Ok(())
    })
}

// ── Report artifacts ──────────────────────────────────────────────────────────

/// `Period,<value_header>`, one row per bucket.
pub fn write_series_csv(series: &AggregatedSeries, value_header: &str, path: &Path) -> Result<()> {
    write_csv_atomic(path, |writer| {
        writer.write_record(["Period", value_header])?;
        for (bucket, total) in series.iter() {
            writer.write_record([bucket.to_string(), total.to_string()])?;
        }
        Ok(())
    })
}

/// `Period,<category>...`, one row per bucket, every cell filled.
pub fn write_pivot_csv(table: &PivotTable, path: &Path) -> Result<()> {
    write_csv_atomic(path, |writer| {
        let mut header = vec!["Period".to_string()];
        header.extend(table.categories().iter().cloned());
        writer.write_record(&header)?;
        for (bucket, cells) in table.rows() {
            let mut record = vec![bucket.to_string()];
            record.extend(cells.iter().map(f64::to_string));
            writer.write_record(&record)?;
        }
        Ok(())
    })
}

/// Hours, credit and rate columns; an unrated bucket has an empty rate cell.
pub fn write_comparison_csv(rows: &[ComparisonRow], path: &Path) -> Result<()> {
    write_csv_atomic(path, |writer| {
        writer.write_record([
            "Period",
            "Session hours",
            "Modem credit",
            "FCFA/hr",
            "Cum. Hrs.",
            "Cum. Credit",
            "FCFA/hr-to-date",
        ])?;
        for row in rows {
            writer.write_record([
                row.bucket.to_string(),
                row.session_hours.to_string(),
                row.modem_credit.to_string(),
                optional(row.rate_per_hour),
                row.cumulative_hours.to_string(),
                row.cumulative_credit.to_string(),
                optional(row.cumulative_rate),
            ])?;
        }
        Ok(())
    })
}

/// One row per team.
pub fn write_team_cost_csv(costs: &[TeamCost], path: &Path) -> Result<()> {
    write_csv_atomic(path, |writer| {
        writer.write_record(["Team", "Modem credit", "Session hours", "FCFA/hr"])?;
        for cost in costs {
            writer.write_record([
                cost.team.clone(),
                cost.modem_credit.to_string(),
                cost.session_hours.to_string(),
                optional(cost.rate),
            ])?;
        }
        Ok(())
    })
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
