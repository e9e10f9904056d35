//! Grammar of the general-ledger report layout.
//!
//! A report page lists each account as a header line followed by its entry
//! lines:
//!
//! ```text
//!   12345-R51057  Bangui Internet: Communications      Beginning Balance    1,250,000
//!   GLJE  004512  01  05-Jan-24  Orange modem credit  Orange CAR  JV-0112  25,000
//!   GLJE  004513  01  19-Jan-24  Moov airtime         Moov        JV-0118  10,000
//!   12346-R51057  Bangui Internet: Hosting             Beginning Balance      300,000
//! ```
//!
//! * header: optional indent, a 5-digit account code, `-`, the fixed
//!   sub-code, spaces, the account name (literal text), any whitespace, then
//!   `Beginning Balance` and the rest of the line;
//! * entry: optional indent, the entry marker, then the line body. The body
//!   opens with a 6-digit sequence number and a 2-digit sub-sequence number;
//! * a block is the unbroken run of entry lines directly after a header.
//!
//! Callers depend on [`LedgerGrammar`] only, so the regex implementation can
//! be replaced by a tokenizer without touching them.

use regex::Regex;

use reports_core::error::{ReportError, Result};
use reports_core::settings::ReportConfig;

/// Recognises ledger blocks and entry lines in report text.
pub trait LedgerGrammar {
    /// Raw entry lines of every block headed by `account`, in document order.
    ///
    /// Returns an empty vector when the account does not appear.
    fn block_entry_lines(&self, text: &str, account: &str) -> Result<Vec<String>>;

    /// The part of an entry line after the marker, sequence and sub-sequence
    /// columns. Lines lacking those columns come back unchanged.
    fn strip_entry_prefix<'a>(&self, line: &'a str) -> &'a str;
}

// ── RegexLedgerGrammar ────────────────────────────────────────────────────────

/// [`LedgerGrammar`] backed by the `regex` crate.
#[derive(Debug, Clone)]
pub struct RegexLedgerGrammar {
    code_suffix: String,
    marker: String,
    entry_prefix: Regex,
}

impl RegexLedgerGrammar {
    /// Build the grammar for a sub-code such as `R51057` and a marker such
    /// as `GLJE`. Both are matched literally.
    pub fn new(code_suffix: &str, marker: &str) -> Result<Self> {
        let marker_lit = regex::escape(marker);
        let entry_prefix = compile(&format!(r"^ *{marker_lit} +[0-9]{{6}} +[0-9]{{2}} +"))?;
        Ok(Self {
            code_suffix: code_suffix.to_string(),
            marker: marker.to_string(),
            entry_prefix,
        })
    }

    pub fn from_config(config: &ReportConfig) -> Result<Self> {
        Self::new(&config.account_code_suffix, &config.entry_marker)
    }

    /// Pattern matching one header line plus the entry run that follows it.
    fn block_pattern(&self, account: &str) -> Result<Regex> {
        let suffix = regex::escape(&self.code_suffix);
        let account = regex::escape(account);
        let marker = regex::escape(&self.marker);
        compile(&format!(
            r"(?m)^ *[0-9]{{5}}-{suffix} +{account}\s+Beginning Balance.*\n((?: *{marker}.+(?:\n|\z))+)"
        ))
    }
}

impl LedgerGrammar for RegexLedgerGrammar {
    fn block_entry_lines(&self, text: &str, account: &str) -> Result<Vec<String>> {
        let pattern = self.block_pattern(account)?;
        let lines = pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .flat_map(|block| block.as_str().split('\n'))
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Ok(lines)
    }

    fn strip_entry_prefix<'a>(&self, line: &'a str) -> &'a str {
        match self.entry_prefix.find(line) {
            Some(m) => &line[m.end()..],
            None => line,
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ReportError::Config(format!("invalid ledger pattern: {e}")))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar() -> RegexLedgerGrammar {
        RegexLedgerGrammar::new("R51057", "GLJE").unwrap()
    }

    #[test]
    fn test_block_entry_lines_single_block() {
        let text = "\
  10001-R51057  Bangui Internet: Communications    Beginning Balance   0.00
  GLJE  000101  01  05-Jan-24  Orange credit  Orange  JV1  25,000
  GLJE  000102  01  19-Jan-24  Moov credit  Moov  JV2  10,000
  Total
";
        let lines = grammar()
            .block_entry_lines(text, "Bangui Internet: Communications")
            .unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("000101"));
        assert!(lines[1].contains("000102"));
    }

    #[test]
    fn test_block_entry_lines_at_end_of_text_without_newline() {
        let text = "10001-R51057 Internet\tBeginning Balance\nGLJE 000101 01 a  b";
        let lines = grammar().block_entry_lines(text, "Internet").unwrap();
        assert_eq!(lines, vec!["GLJE 000101 01 a  b"]);
    }

    #[test]
    fn test_block_requires_fixed_sub_code() {
        let text = "10001-R99999 Internet  Beginning Balance\nGLJE 000101 01 x\n";
        assert!(grammar().block_entry_lines(text, "Internet").unwrap().is_empty());
    }

    #[test]
    fn test_block_requires_five_digit_code() {
        let text = "1001-R51057 Internet  Beginning Balance\nGLJE 000101 01 x\n";
        assert!(grammar().block_entry_lines(text, "Internet").unwrap().is_empty());
    }

    #[test]
    fn test_account_name_is_literal() {
        // "." and "(" would be pattern syntax if left unescaped.
        let text = "\
10001-R51057 Net (Q1).x  Beginning Balance
GLJE 000101 01 first
10002-R51057 Net (Q1)ax  Beginning Balance
GLJE 000102 01 second
";
        let lines = grammar().block_entry_lines(text, "Net (Q1).x").unwrap();
        assert_eq!(lines, vec!["GLJE 000101 01 first"]);
    }

    #[test]
    fn test_marker_is_literal() {
        let grammar = RegexLedgerGrammar::new("R51057", "GL.E").unwrap();
        let dotted = "10001-R51057 Internet  Beginning Balance\n  GL.E 000101 01 x\n";
        let plain = "10001-R51057 Internet  Beginning Balance\n  GLJE 000101 01 x\n";
        assert_eq!(
            grammar.block_entry_lines(dotted, "Internet").unwrap(),
            vec!["  GL.E 000101 01 x"]
        );
        assert!(grammar.block_entry_lines(plain, "Internet").unwrap().is_empty());
        assert_eq!(grammar.strip_entry_prefix("GLJE 000101 01 x"), "GLJE 000101 01 x");
    }

    #[test]
    fn test_strip_entry_prefix() {
        let g = grammar();
        assert_eq!(
            g.strip_entry_prefix("   GLJE  004512  01  05-Jan-24  Orange"),
            "05-Jan-24  Orange"
        );
    }

    #[test]
    fn test_strip_entry_prefix_leaves_malformed_line() {
        let g = grammar();
        assert_eq!(g.strip_entry_prefix("GLJE  45  1  x"), "GLJE  45  1  x");
        assert_eq!(g.strip_entry_prefix("no marker here"), "no marker here");
    }
}
