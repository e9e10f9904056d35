//! Fixed-width ledger line → delimited row.

use serde::{Deserialize, Serialize};

use crate::grammar::LedgerGrammar;

/// One ledger line split into its report columns.
///
/// The field count varies: some entries carry optional trailing columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub fields: Vec<String>,
}

impl NormalizedRow {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Recovers report columns from a raw entry line.
#[derive(Debug, Clone)]
pub struct LedgerLineNormalizer<G> {
    grammar: G,
}

impl<G: LedgerGrammar> LedgerLineNormalizer<G> {
    pub fn new(grammar: G) -> Self {
        Self { grammar }
    }

    /// Strip the marker / sequence / sub-sequence columns, then split on
    /// every run of two or more spaces.
    ///
    /// Lines without the leading numeric columns are still split; nothing is
    /// rejected.
    pub fn normalize(&self, line: &str) -> NormalizedRow {
        let body = self.grammar.strip_entry_prefix(line).trim();
        if body.is_empty() {
            return NormalizedRow { fields: Vec::new() };
        }
        NormalizedRow {
            fields: split_columns(body),
        }
    }

    pub fn normalize_all<'a, I>(&self, lines: I) -> Vec<NormalizedRow>
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines.into_iter().map(|line| self.normalize(line)).collect()
    }
}

/// Split on runs of two or more spaces.
///
/// Report columns are separated by at least two spaces; single spaces belong
/// to the text inside a column. `body` must already be trimmed.
fn split_columns(body: &str) -> Vec<String> {
    body.split(COLUMN_GAP)
        .map(str::trim_start)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

const COLUMN_GAP: &str = "  ";

// ── Tests ─────────────────────────────────────────────────────────────────────
