//! Ledger PDF → ledger CSV conversion, one document or a whole directory.

use std::path::{Path, PathBuf};

use reports_core::error::{ReportError, Result};
use reports_core::settings::ReportConfig;
use tracing::{debug, info, warn};

use crate::artifacts::write_ledger_csv;
use crate::extractor::LedgerExtractor;
use crate::grammar::RegexLedgerGrammar;
use crate::normalizer::LedgerLineNormalizer;
use crate::pdf_text::PdfTextSource;

/// The 4-digit year a ledger report's file name starts with.
pub fn year_prefix(pdf: &Path) -> Result<String> {
    let name = pdf
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let year: String = name.chars().take(4).collect();
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Ok(year)
    } else {
        Err(ReportError::MissingYearPrefix(pdf.to_path_buf()))
    }
}

/// `"<year> CAR <account>.csv"`.
pub fn ledger_csv_name(year: &str, account: &str) -> String {
    format!("{year} CAR {account}.csv")
}

/// Outcome counts of a batch conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// CSVs written.
    pub converted: Vec<PathBuf>,
    /// Documents in which the account does not appear.
    pub skipped_no_account: Vec<PathBuf>,
    /// Documents whose text could not be extracted.
    pub failed: Vec<PathBuf>,
}

/// Wires a text source, extractor, normalizer and CSV writer together.
pub struct LedgerConverter<S> {
    source: S,
    extractor: LedgerExtractor<RegexLedgerGrammar>,
    normalizer: LedgerLineNormalizer<RegexLedgerGrammar>,
}

impl<S: PdfTextSource> LedgerConverter<S> {
    pub fn new(source: S, grammar: RegexLedgerGrammar) -> Self {
        Self {
            source,
            extractor: LedgerExtractor::new(grammar.clone()),
            normalizer: LedgerLineNormalizer::new(grammar),
        }
    }

    pub fn from_config(source: S, config: &ReportConfig) -> Result<Self> {
        Ok(Self::new(source, RegexLedgerGrammar::from_config(config)?))
    }

    /// Convert one report.
    ///
    /// The CSV lands in `outdir`, or beside the PDF when `outdir` is `None`.
    /// Returns `Ok(None)` when the account has no block in the document; no
    /// file is written in that case.
    pub fn convert(
        &self,
        pdf: &Path,
        account: &str,
        outdir: Option<&Path>,
    ) -> Result<Option<PathBuf>> {
        let year = year_prefix(pdf)?;
        let text = self.source.document_text(pdf)?;

        let lines = self.extractor.extract(&text, account)?;
        if lines.is_empty() {
            info!("No data found for {} in {}", account, pdf.display());
            return Ok(None);
        }

        let rows = self.normalizer.normalize_all(lines.iter().map(String::as_str));
        let dir = match outdir {
            Some(dir) => dir.to_path_buf(),
            None => pdf.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let csv_path = dir.join(ledger_csv_name(&year, account));
        write_ledger_csv(&rows, &csv_path)?;

        info!(
            "Wrote {} rows from {} to {}",
            rows.len(),
            pdf.display(),
            csv_path.display()
        );
        Ok(Some(csv_path))
    }

    /// Convert every PDF in `reports_dir` whose name contains `name_filter`.
    ///
    /// A file name without a year prefix aborts the batch. Any other
    /// per-document failure is logged and the batch moves on.
    pub fn convert_all(
        &self,
        reports_dir: &Path,
        name_filter: &str,
        account: &str,
        outdir: &Path,
    ) -> Result<ConversionSummary> {
        let mut summary = ConversionSummary::default();
        let pdfs = find_report_pdfs(reports_dir, name_filter);
        debug!(
            "{} candidate reports in {} (backend: {})",
            pdfs.len(),
            reports_dir.display(),
            self.source.backend_name()
        );

        for pdf in pdfs {
            match self.convert(&pdf, account, Some(outdir)) {
                Ok(Some(csv)) => summary.converted.push(csv),
                Ok(None) => summary.skipped_no_account.push(pdf),
                Err(e @ ReportError::MissingYearPrefix(_)) => return Err(e),
                Err(e) => {
                    warn!("Skipping {}: {}", pdf.display(), e);
                    summary.failed.push(pdf);
                }
            }
        }

        info!(
            "Converted {} reports ({} without {}, {} failed)",
            summary.converted.len(),
            summary.skipped_no_account.len(),
            account,
            summary.failed.len()
        );
        Ok(summary)
    }
}

/// PDFs directly inside `dir` whose file name contains `name_filter`, sorted.
pub fn find_report_pdfs(dir: &Path, name_filter: &str) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Reports directory does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            entry.file_type().is_file()
                && name.contains(name_filter)
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    const ACCOUNT: &str = "Bangui Internet: Communications";

    /// Text source keyed by file name; unknown names fail like an unreadable PDF.
    struct FakeReports(HashMap<String, String>);

    impl PdfTextSource for FakeReports {
        fn pages(&self, path: &Path) -> Result<Vec<String>> {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.0
                .get(&name)
                .map(|text| vec![text.clone()])
                .ok_or_else(|| ReportError::PdfExtraction {
                    path: path.to_path_buf(),
                    message: "damaged".to_string(),
                })
        }

        fn backend_name(&self) -> &str {
            "fake"
        }
    }

    fn report_text(entries: &[&str]) -> String {
        let mut text = String::from(
            "12345-R51057  Bangui Internet: Communications    Beginning Balance    1,250,000\n",
        );
        for entry in entries {
            text.push_str(entry);
            text.push('\n');
        }
        text.push_str("                      Account Total   1,285,000\n");
        text
    }

    fn converter(reports: &[(&str, String)]) -> LedgerConverter<FakeReports> {
        let map = reports
            .iter()
            .map(|(name, text)| (name.to_string(), text.clone()))
            .collect();
        LedgerConverter::new(
            FakeReports(map),
            RegexLedgerGrammar::new("R51057", "GLJE").unwrap(),
        )
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"%PDF").unwrap();
        path
    }

    // ── year_prefix / naming ──────────────────────────────────────────────────

    #[test]
    fn test_year_prefix() {
        assert_eq!(
            year_prefix(Path::new("/r/2024 Bangui Internet-donor Jan.pdf")).unwrap(),
            "2024"
        );
        assert!(matches!(
            year_prefix(Path::new("/r/Jan 2024.pdf")),
            Err(ReportError::MissingYearPrefix(_))
        ));
        assert!(year_prefix(Path::new("/r/202.pdf")).is_err());
    }

    #[test]
    fn test_ledger_csv_name() {
        assert_eq!(
            ledger_csv_name("2024", ACCOUNT),
            "2024 CAR Bangui Internet: Communications.csv"
        );
    }

    // ── convert ───────────────────────────────────────────────────────────────

    #[test]
    fn test_convert_writes_csv_beside_pdf() {
        let dir = TempDir::new().unwrap();
        let name = "2024 Bangui Internet-donor Jan.pdf";
        let pdf = touch(dir.path(), name);
        let text = report_text(&[
            "  GLJE  004512  01  05-Jan-24  Orange modem credit  Orange CAR  JV-0112  25,000",
            "  GLJE  004513  01  19-Jan-24  Moov airtime  Moov  JV-0118  10,000",
        ]);
        let conv = converter(&[(name, text)]);

        let csv = conv.convert(&pdf, ACCOUNT, None).unwrap().unwrap();

        assert_eq!(csv, dir.path().join("2024 CAR Bangui Internet: Communications.csv"));
        let content = std::fs::read_to_string(&csv).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "05-Jan-24,Orange modem credit,Orange CAR,JV-0112,\"25,000\"");
    }

    #[test]
    fn test_convert_absent_account_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let name = "2024 report.pdf";
        let pdf = touch(dir.path(), name);
        let conv = converter(&[(name, report_text(&["  GLJE  000001  01  05-Jan-24  a  b  c  1"]))]);

        let out = conv.convert(&pdf, "Bangui Internet: Satellite", None).unwrap();

        assert!(out.is_none());
        assert!(!dir.path().join("2024 CAR Bangui Internet: Satellite.csv").exists());
    }

    #[test]
    fn test_convert_rejects_missing_year_before_extracting() {
        let dir = TempDir::new().unwrap();
        let pdf = touch(dir.path(), "report.pdf");
        let conv = converter(&[]);
        assert!(matches!(
            conv.convert(&pdf, ACCOUNT, None),
            Err(ReportError::MissingYearPrefix(_))
        ));
    }

    // ── convert_all ───────────────────────────────────────────────────────────

    #[test]
    fn test_convert_all_continues_past_local_failures() {
        let reports = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        touch(reports.path(), "2023 Bangui Internet-donor.pdf");
        touch(reports.path(), "2024 Bangui Internet-donor.pdf");
        touch(reports.path(), "2025 Bangui Internet-donor.pdf");
        touch(reports.path(), "2024 Other.pdf");

        let conv = converter(&[
            (
                "2023 Bangui Internet-donor.pdf",
                report_text(&["  GLJE  000001  01  05-Jan-23  a  b  c  1"]),
            ),
            ("2024 Bangui Internet-donor.pdf", "no ledger here\n".to_string()),
        ]);

        let summary = conv
            .convert_all(reports.path(), "Bangui Internet-donor", ACCOUNT, data.path())
            .unwrap();

        assert_eq!(summary.converted.len(), 1);
        assert_eq!(summary.skipped_no_account.len(), 1);
        assert_eq!(summary.failed.len(), 1);
        assert!(data
            .path()
            .join("2023 CAR Bangui Internet: Communications.csv")
            .exists());
    }

    #[test]
    fn test_convert_all_missing_year_is_fatal() {
        let reports = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        touch(reports.path(), "Bangui Internet-donor.pdf");

        let result = converter(&[]).convert_all(
            reports.path(),
            "Bangui Internet-donor",
            ACCOUNT,
            data.path(),
        );
        assert!(matches!(result, Err(ReportError::MissingYearPrefix(_))));
    }

    #[test]
    fn test_find_report_pdfs_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "2024 Bangui Internet-donor.pdf");
        touch(dir.path(), "2023 Bangui Internet-donor.PDF");
        touch(dir.path(), "2024 Bangui Internet-donor.txt");
        touch(dir.path(), "2024 Payroll.pdf");
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested"), "2022 Bangui Internet-donor.pdf");

        let found = find_report_pdfs(dir.path(), "Bangui Internet-donor");
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["2023 Bangui Internet-donor.PDF", "2024 Bangui Internet-donor.pdf"]
        );
    }

    #[test]
    fn test_find_report_pdfs_missing_dir() {
        assert!(find_report_pdfs(Path::new("/nonexistent/GL Reports"), "x").is_empty());
    }
}
