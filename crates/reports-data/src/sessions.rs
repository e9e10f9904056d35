//! Session export loading.
//!
//! The export is a spreadsheet form dump: one header row, then one row per
//! logged session. Only four columns matter (work date, team, duration and
//! session format); their positions come from [`SessionExportConfig`].

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use reports_core::error::{ReportError, Result};
use reports_core::models::{SessionFormat, SessionRecord};
use reports_core::settings::SessionExportConfig;
use tracing::{debug, info, warn};

/// Parse a duration written with a decimal comma (`"1,5"`) or point.
///
/// Returns `None` for blank, non-numeric or negative values.
pub fn parse_duration(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: f64 = trimmed.replace(',', ".").parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Load every usable session from the export at `path`.
///
/// Rows are dropped, not defaulted, when the format is blank or the duration
/// is missing or unparsable. Rows with an unparsable date are logged and
/// dropped. The result is sorted by date.
///
/// Fails with [`ReportError::NoSessionData`] when nothing usable remains.
pub fn load_sessions(path: &Path, config: &SessionExportConfig) -> Result<Vec<SessionRecord>> {
    let file = File::open(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for (index, row) in reader.records().enumerate() {
        // +2: one for the header, one for 1-based numbering.
        let line = index + 2;
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                warn!("{}:{}: unreadable row: {}", path.display(), line, e);
                dropped += 1;
                continue;
            }
        };
        let cell = |column: usize| row.get(column).unwrap_or("");

        let format_label = cell(config.format_column);
        if format_label.trim().is_empty() {
            debug!("{}:{}: no session format", path.display(), line);
            dropped += 1;
            continue;
        }

        let Some(duration_hours) = parse_duration(cell(config.duration_column)) else {
            debug!("{}:{}: no usable duration", path.display(), line);
            dropped += 1;
            continue;
        };

        let raw_date = cell(config.date_column);
        let date = match NaiveDate::parse_from_str(raw_date.trim(), &config.date_format) {
            Ok(d) => d,
            Err(_) => {
                warn!("{}:{}: invalid date {:?}", path.display(), line, raw_date);
                dropped += 1;
                continue;
            }
        };

        records.push(SessionRecord {
            date,
            duration_hours,
            format: SessionFormat::classify(
                format_label,
                &config.remote_prefix,
                &config.in_person_prefix,
            ),
            team: cell(config.team_column).trim().to_string(),
        });
    }

    if records.is_empty() {
        return Err(ReportError::NoSessionData(path.to_path_buf()));
    }

    records.sort_by_key(|r| r.date);
    info!(
        "Loaded {} sessions from {} ({} dropped)",
        records.len(),
        path.display(),
        dropped
    );
    Ok(records)
}

/// Sessions of one delivery format.
pub fn with_format(records: &[SessionRecord], format: SessionFormat) -> Vec<SessionRecord> {
    records
        .iter()
        .filter(|r| r.format == format)
        .cloned()
        .collect()
}

/// Sessions whose team does not start with any of `excluded_prefixes`.
pub fn without_teams(records: &[SessionRecord], excluded_prefixes: &[String]) -> Vec<SessionRecord> {
    records
        .iter()
        .filter(|r| {
            !excluded_prefixes
                .iter()
                .any(|prefix| !prefix.is_empty() && r.team.starts_with(prefix.as_str()))
        })
        .cloned()
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "Timestamp,Email,Work date,Team,Activity,Consultant,Duration,Format\n";

    fn write_export(dir: &Path, rows: &[&str]) -> std::path::PathBuf {
        let path = dir.join("responses.csv");
        let mut content = HEADER.to_string();
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── parse_duration ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_duration_decimal_comma() {
        assert_eq!(parse_duration("1,5"), Some(1.5));
        assert_eq!(parse_duration(" 2 "), Some(2.0));
        assert_eq!(parse_duration("0.25"), Some(0.25));
    }

    #[test]
    fn test_parse_duration_rejects_unusable() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("two"), None);
        assert_eq!(parse_duration("-1"), None);
    }

    // ── load_sessions ─────────────────────────────────────────────────────────

    #[test]
    fn test_load_sessions_typed_and_sorted() {
        let dir = TempDir::new().unwrap();
        let path = write_export(
            dir.path(),
            &[
                "t,e,02/10/2024,TeamB,a,c,\"1,5\",Remote (Zoom)",
                "t,e,01/05/2024,TeamA,a,c,2,In person",
                "t,e,01/06/2024, ,a,c,1,Email",
            ],
        );

        let records = load_sessions(&path, &SessionExportConfig::default()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date, date(2024, 1, 5));
        assert_eq!(records[0].format, SessionFormat::InPerson);
        assert_eq!(records[1].format, SessionFormat::Other);
        assert!(!records[1].has_team());
        assert_eq!(records[2].team, "TeamB");
        assert_eq!(records[2].duration_hours, 1.5);
        assert_eq!(records[2].format, SessionFormat::Remote);
    }

    #[test]
    fn test_load_sessions_drops_incomplete_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_export(
            dir.path(),
            &[
                "t,e,01/05/2024,TeamA,a,c,2,",
                "t,e,01/05/2024,TeamA,a,c,,Remote",
                "t,e,01/05/2024,TeamA,a,c,n/a,Remote",
                "t,e,2024-01-05,TeamA,a,c,1,Remote",
                "t,e,01/07/2024,TeamA,a,c,3,Remote",
            ],
        );

        let records = load_sessions(&path, &SessionExportConfig::default()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].duration_hours, 3.0);
    }

    #[test]
    fn test_load_sessions_without_usable_rows_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_export(dir.path(), &["t,e,01/05/2024,TeamA,a,c,,"]);
        assert!(matches!(
            load_sessions(&path, &SessionExportConfig::default()),
            Err(ReportError::NoSessionData(_))
        ));
    }

    #[test]
    fn test_load_sessions_missing_file() {
        let result = load_sessions(
            Path::new("/nonexistent/responses.csv"),
            &SessionExportConfig::default(),
        );
        assert!(matches!(result, Err(ReportError::FileRead { .. })));
    }

    // ── filters ───────────────────────────────────────────────────────────────

    fn record(team: &str, format: SessionFormat) -> SessionRecord {
        SessionRecord {
            date: date(2024, 1, 5),
            duration_hours: 1.0,
            format,
            team: team.to_string(),
        }
    }

    #[test]
    fn test_with_format() {
        let records = vec![
            record("A", SessionFormat::Remote),
            record("B", SessionFormat::InPerson),
            record("C", SessionFormat::Remote),
        ];
        let remote = with_format(&records, SessionFormat::Remote);
        assert_eq!(remote.len(), 2);
        assert!(remote.iter().all(|r| r.format == SessionFormat::Remote));
    }

    #[test]
    fn test_without_teams_prefix() {
        let records = vec![
            record("IT and Language Technology services, ACATBA", SessionFormat::Remote),
            record("IT and Language Technology services, ACATBA (Bangui)", SessionFormat::Remote),
            record("Gbaya", SessionFormat::Remote),
        ];
        let kept = without_teams(
            &records,
            &["IT and Language Technology services, ACATBA".to_string()],
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].team, "Gbaya");
        assert_eq!(without_teams(&records, &[String::new()]).len(), 3);
    }
}
