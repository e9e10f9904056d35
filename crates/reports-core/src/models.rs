use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Ledger ────────────────────────────────────────────────────────────────────

/// One general-ledger transaction, typed once when the ledger CSV is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Posting date from the report's `DD-Mon-YY` column.
    pub date: NaiveDate,
    /// Free-text memo, e.g. `"Orange modem credit March"`.
    pub description: String,
    /// Originating journal or counterparty, e.g. `"Ecobank"`.
    pub source: String,
    /// Document or voucher reference.
    pub reference: String,
    /// Signed amount in the report currency.
    pub amount: f64,
    /// The row exactly as it appears in the ledger CSV.
    pub fields: Vec<String>,
}

// ── Sessions ──────────────────────────────────────────────────────────────────

/// How a logged work session was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionFormat {
    InPerson,
    Remote,
    Other,
}

impl SessionFormat {
    /// Classify a free-text format label by its prefix.
    ///
    /// Matching is case-sensitive, as the export always capitalises the two
    /// recognised labels.
    pub fn classify(label: &str, remote_prefix: &str, in_person_prefix: &str) -> Self {
        let label = label.trim_start();
        if label.starts_with(remote_prefix) {
            SessionFormat::Remote
        } else if label.starts_with(in_person_prefix) {
            SessionFormat::InPerson
        } else {
            SessionFormat::Other
        }
    }
}

/// One logged work session from the session export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Day the work took place.
    pub date: NaiveDate,
    /// Session length in hours; may be fractional.
    pub duration_hours: f64,
    pub format: SessionFormat,
    /// Team the hours are billed to; may be blank.
    pub team: String,
}

impl SessionRecord {
    /// Whether the record carries a usable team attribution.
    pub fn has_team(&self) -> bool {
        !self.team.trim().is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
