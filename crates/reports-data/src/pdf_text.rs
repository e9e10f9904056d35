//! Plain-text extraction from ledger PDF reports.
//!
//! The pipeline only needs a PDF's pages as ordered text blocks with the
//! report's fixed-width columns preserved. [`PdfToText`] gets them from
//! poppler's `pdftotext -layout`; tests substitute their own source.

use std::path::Path;
use std::process::Command;

use reports_core::error::{ReportError, Result};
use tracing::debug;

/// Page separator emitted by `pdftotext`.
const FORM_FEED: char = '\u{000C}';

/// Backend able to turn a PDF document into per-page text.
pub trait PdfTextSource {
    /// Extract every page of `path` in document order.
    fn pages(&self, path: &Path) -> Result<Vec<String>>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;

    /// All pages joined with newlines.
    fn document_text(&self, path: &Path) -> Result<String> {
        Ok(self.pages(path)?.join("\n"))
    }
}

// ── PdfToText ─────────────────────────────────────────────────────────────────

/// Runs `pdftotext -layout <file> -` and splits its output on form feeds.
#[derive(Debug, Clone)]
pub struct PdfToText {
    program: String,
}

impl Default for PdfToText {
    fn default() -> Self {
        Self {
            program: "pdftotext".to_string(),
        }
    }
}

impl PdfToText {
    /// Use an alternative executable, e.g. an absolute path to `pdftotext`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl PdfTextSource for PdfToText {
    fn pages(&self, path: &Path) -> Result<Vec<String>> {
        let pdf_err = |message: String| ReportError::PdfExtraction {
            path: path.to_path_buf(),
            message,
        };

        let output = Command::new(&self.program)
            .arg("-layout")
            .arg(path)
            .arg("-")
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    pdf_err(format!("{} not installed (poppler-utils)", self.program))
                }
                _ => pdf_err(format!("failed to run {}: {}", self.program, e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(pdf_err(format!(
                "{} failed (exit {}): {}",
                self.program,
                output.status.code().unwrap_or(-1),
                stderr.trim(),
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        let pages = split_pages(&text);
        debug!("{}: {} pages from {}", self.program, pages.len(), path.display());
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        &self.program
    }
}

/// Split `pdftotext` output into pages, dropping the empty tail after the
/// final form feed.
pub fn split_pages(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split(FORM_FEED).map(str::to_string).collect();
    while pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}

// ── Tests ─────────────────────────────────────────────────────────────────────
