use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the service reports pipeline.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output artifact could not be written or moved into place.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A ledger report file name does not begin with a 4-digit year.
    #[error("File name doesn't start with 4 digits: {0}")]
    MissingYearPrefix(PathBuf),

    /// The external PDF text extractor failed for one document.
    #[error("Failed to extract text from {path}: {message}")]
    PdfExtraction { path: PathBuf, message: String },

    /// A CSV document could not be parsed or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A date string did not match the expected format.
    #[error("Invalid date: {0}")]
    DateParse(String),

    /// An amount or duration string is not a number.
    #[error("Invalid number: {0}")]
    NumberParse(String),

    /// The session export produced no usable records.
    #[error("No session data found in {0}")]
    NoSessionData(PathBuf),

    /// No ledger CSV for the account exists in the data directory.
    #[error("No ledger data for {account} in {dir}")]
    NoLedgerData { account: String, dir: PathBuf },

    /// The ledger reports directory could not be located.
    #[error("\"GL Reports\" folder not found: {0}")]
    ReportsDirNotFound(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the reports crates.
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ReportError::FileRead {
            path: PathBuf::from("/reports/2024-03.pdf"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/reports/2024-03.pdf"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_missing_year_prefix() {
        let err = ReportError::MissingYearPrefix(PathBuf::from("march.pdf"));
        assert_eq!(err.to_string(), "File name doesn't start with 4 digits: march.pdf");
    }

    #[test]
    fn test_error_display_pdf_extraction() {
        let err = ReportError::PdfExtraction {
            path: PathBuf::from("2024 GL.pdf"),
            message: "pdftotext not installed".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2024 GL.pdf"));
        assert!(msg.contains("pdftotext not installed"));
    }

    #[test]
    fn test_error_display_no_session_data() {
        let err = ReportError::NoSessionData(PathBuf::from("/tmp/responses.csv"));
        assert_eq!(err.to_string(), "No session data found in /tmp/responses.csv");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ReportError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: ReportError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
