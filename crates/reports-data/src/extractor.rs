//! Locates one account's ledger blocks in report text.

use reports_core::error::Result;
use tracing::{debug, info};

use crate::grammar::LedgerGrammar;

/// Finds the entry lines of a named account in page-joined report text.
#[derive(Debug, Clone)]
pub struct LedgerExtractor<G> {
    grammar: G,
}

impl<G: LedgerGrammar> LedgerExtractor<G> {
    pub fn new(grammar: G) -> Self {
        Self { grammar }
    }

    /// Ordered entry lines of every block belonging to `account`.
    ///
    /// An account may head a block once per statement page; all of them are
    /// collected in document order. A missing account is not an error: the
    /// result is simply empty and the caller skips output for the document.
    pub fn extract(&self, text: &str, account: &str) -> Result<Vec<String>> {
        let text = text.replace("\r\n", "\n");
        let lines = self.grammar.block_entry_lines(&text, account)?;
        if lines.is_empty() {
            info!("No data found for: {}", account);
        } else {
            debug!("Found {} entry lines for {}", lines.len(), account);
        }
        Ok(lines)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
