//! Ledger CSV loading and expense cleaning.

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use reports_core::error::{ReportError, Result};
use reports_core::models::LedgerEntry;
use reports_core::settings::{ExclusionRule, LedgerColumns, LedgerField, ReportConfig};
use tracing::{debug, info, warn};

use crate::artifacts::write_csv_atomic;

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Ledger CSVs for `account` in `data_dir` (`"<year> CAR <account>.csv"`),
/// sorted by name and therefore by year.
pub fn find_ledger_csvs(data_dir: &Path, account: &str) -> Vec<PathBuf> {
    if !data_dir.exists() {
        warn!("Data directory does not exist: {}", data_dir.display());
        return Vec::new();
    }

    let suffix = format!(" CAR {account}.csv");
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            entry.file_type().is_file()
                && name.ends_with(&suffix)
                && name.len() == 4 + suffix.len()
                && name.as_bytes()[..4].iter().all(u8::is_ascii_digit)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// `"CAR <account>, combined.csv"`.
pub fn combined_csv_name(account: &str) -> String {
    format!("CAR {account}, combined.csv")
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse a report amount: thousands commas, optional sign, and accounting
/// parentheses for negatives (`"(1,000)"` is `-1000`).
pub fn parse_amount(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let (negative, body) = match trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
    {
        Some(inner) => (true, inner.trim()),
        None => (false, trimmed),
    };
    let cleaned: String = body.chars().filter(|c| *c != ',').collect();
    let value: f64 = cleaned
        .parse()
        .map_err(|_| ReportError::NumberParse(raw.to_string()))?;
    if !value.is_finite() {
        return Err(ReportError::NumberParse(raw.to_string()));
    }
    Ok(if negative { -value } else { value })
}

/// Type one raw ledger CSV row.
pub fn parse_ledger_row(
    fields: &[String],
    columns: &LedgerColumns,
    date_format: &str,
) -> Result<LedgerEntry> {
    let raw_date = column(fields, columns.date)?;
    let date = NaiveDate::parse_from_str(raw_date.trim(), date_format)
        .map_err(|_| ReportError::DateParse(raw_date.to_string()))?;

    Ok(LedgerEntry {
        date,
        description: column(fields, columns.description)?.to_string(),
        source: column(fields, columns.source)?.to_string(),
        reference: column(fields, columns.reference)?.to_string(),
        amount: parse_amount(column(fields, columns.amount)?)?,
        fields: fields.to_vec(),
    })
}

fn column(fields: &[String], index: usize) -> Result<&str> {
    fields.get(index).map(String::as_str).ok_or_else(|| {
        ReportError::Config(format!(
            "ledger row has {} fields, column {} requested",
            fields.len(),
            index
        ))
    })
}

/// Read one ledger CSV (no header row).
///
/// Rows that do not type-check are logged and skipped; an unreadable file is
/// an error.
pub fn load_ledger_rows(
    path: &Path,
    columns: &LedgerColumns,
    date_format: &str,
) -> Result<Vec<LedgerEntry>> {
    let file = File::open(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut entries = Vec::new();
    let mut skipped = 0usize;
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!("{}:{}: unreadable row: {}", path.display(), line + 1, e);
                skipped += 1;
                continue;
            }
        };
        let fields: Vec<String> = record.iter().map(str::to_string).collect();
        if fields.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        match parse_ledger_row(&fields, columns, date_format) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                warn!("{}:{}: skipping row: {}", path.display(), line + 1, e);
                skipped += 1;
            }
        }
    }

    debug!(
        "Loaded {} ledger rows from {} ({} skipped)",
        entries.len(),
        path.display(),
        skipped
    );
    Ok(entries)
}

/// Every ledger row for the configured account, concatenated across years.
///
/// Fails with [`ReportError::NoLedgerData`] when no ledger CSV exists.
pub fn load_ledger(data_dir: &Path, config: &ReportConfig) -> Result<Vec<LedgerEntry>> {
    let files = find_ledger_csvs(data_dir, &config.account_name);
    if files.is_empty() {
        return Err(ReportError::NoLedgerData {
            account: config.account_name.clone(),
            dir: data_dir.to_path_buf(),
        });
    }

    let mut entries = Vec::new();
    for file in &files {
        entries.extend(load_ledger_rows(
            file,
            &config.ledger_columns,
            &config.ledger_date_format,
        )?);
    }
    info!("Loaded {} ledger rows from {} files", entries.len(), files.len());
    Ok(entries)
}

/// Write the cleaned ledger as one CSV, rows exactly as loaded.
pub fn write_combined_csv(entries: &[LedgerEntry], path: &Path) -> Result<()> {
    write_csv_atomic(path, |writer| {
        for entry in entries {
            writer.write_record(&entry.fields)?;
        }
        Ok(())
    })
}

// ── ExpenseCleaner ────────────────────────────────────────────────────────────

/// Drops duplicate and excluded ledger rows and orders the rest by date.
#[derive(Debug, Clone, Default)]
pub struct ExpenseCleaner {
    rules: Vec<ExclusionRule>,
}

impl ExpenseCleaner {
    pub fn new(rules: Vec<ExclusionRule>) -> Self {
        Self { rules }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.expense_exclusions.clone())
    }

    pub fn rules(&self) -> &[ExclusionRule] {
        &self.rules
    }

    /// Whether any rule excludes `entry`.
    pub fn is_excluded(&self, entry: &LedgerEntry) -> bool {
        self.rules.iter().any(|rule| {
            let value = match rule.field {
                LedgerField::Description => &entry.description,
                LedgerField::Source => &entry.source,
                LedgerField::Reference => &entry.reference,
            };
            rule.matches(value)
        })
    }

    /// Remove exact duplicate rows (first occurrence kept), then excluded
    /// rows, then sort by date. Rows sharing a date keep their input order,
    /// so cleaning a cleaned ledger returns it unchanged.
    pub fn clean(&self, entries: Vec<LedgerEntry>) -> Vec<LedgerEntry> {
        let total = entries.len();
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        let mut duplicates = 0usize;
        let mut excluded = 0usize;

        let mut kept: Vec<LedgerEntry> = Vec::with_capacity(total);
        for entry in entries {
            if !seen.insert(entry.fields.clone()) {
                duplicates += 1;
                continue;
            }
            if self.is_excluded(&entry) {
                excluded += 1;
                continue;
            }
            kept.push(entry);
        }
        kept.sort_by_key(|e| e.date);

        debug!(
            "Cleaned ledger: {} rows in, {} duplicates, {} excluded, {} kept",
            total,
            duplicates,
            excluded,
            kept.len()
        );
        kept
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
