use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use reports_core::error::ReportError;
use reports_core::settings::ReportConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Directory holding reports data produced alongside the ledger PDFs.
const DATA_DIR_NAME: &str = "GL Data";
/// Directory name searched for when no reports directory is configured.
const REPORTS_DIR_NAME: &str = "GL Reports";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.service-reports/` exists.
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    ensure_directories_in(&home)
}

fn ensure_directories_in(home: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(home.join(".service-reports"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI level name (`DEBUG`, `INFO`, `WARNING`, `ERROR`) to a filter
/// directive. Unknown names pass through unchanged.
fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to stderr; when `log_file` is given, the same events are also
/// appended to that file without ANSI colours.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(filter_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

// ── Path discovery ─────────────────────────────────────────────────────────────

/// First directory named `GL Reports` under `search_root`, in file-name order.
pub fn discover_reports_dir(search_root: &Path) -> Result<PathBuf, ReportError> {
    walkdir::WalkDir::new(search_root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_dir() && entry.file_name() == REPORTS_DIR_NAME)
        .map(|entry| entry.into_path())
        .ok_or_else(|| ReportError::ReportsDirNotFound(search_root.to_path_buf()))
}

/// The configured reports directory, or the one discovered under the search
/// root.
pub fn reports_dir(config: &ReportConfig) -> Result<PathBuf, ReportError> {
    match &config.reports_dir {
        Some(dir) if dir.is_dir() => Ok(dir.clone()),
        Some(dir) => Err(ReportError::ReportsDirNotFound(dir.clone())),
        None => discover_reports_dir(&config.resolved_search_root()),
    }
}

/// The configured data directory, or `GL Data` beside `reports_dir`.
/// Created when missing.
pub fn data_dir(config: &ReportConfig, reports_dir: Option<&Path>) -> Result<PathBuf, ReportError> {
    let dir = match (&config.data_dir, reports_dir) {
        (Some(dir), _) => dir.clone(),
        (None, Some(reports)) => reports
            .parent()
            .map(|parent| parent.join(DATA_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME)),
        (None, None) => {
            return Err(ReportError::Config(
                "no data directory configured and no reports directory to derive it from"
                    .to_string(),
            ))
        }
    };
    std::fs::create_dir_all(&dir).map_err(|source| ReportError::FileWrite {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
