mod bootstrap;
mod display;

use std::path::Path;

use anyhow::{Context, Result};
use reports_core::settings::{ReportConfig, Settings};
use reports_data::conversion::LedgerConverter;
use reports_data::pdf_text::PdfToText;
use reports_data::reports::ReportPipeline;
use reports_data::sessions::load_sessions;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("service-reports v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = settings.config_path();
    let config = settings
        .resolve_config()
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;

    if settings.write_config {
        config.save_to(&config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    if let Some(pdf) = &settings.pdf {
        return convert_single(pdf, &config);
    }

    // ── Ledger conversion ─────────────────────────────────────────────────────
    let reports_dir = if settings.no_extract && config.data_dir.is_some() {
        None
    } else {
        Some(bootstrap::reports_dir(&config)?)
    };
    let data_dir = bootstrap::data_dir(&config, reports_dir.as_deref())?;

    if let Some(reports_dir) = reports_dir.as_deref().filter(|_| !settings.no_extract) {
        tracing::info!("Converting ledger reports in {}", reports_dir.display());
        let converter = LedgerConverter::from_config(PdfToText::default(), &config)?;
        converter
            .convert_all(
                reports_dir,
                &config.pdf_name_filter,
                &config.account_name,
                &data_dir,
            )
            .with_context(|| format!("converting ledger reports for {}", config.account_name))?;
    }

    // ── Reports ───────────────────────────────────────────────────────────────
    let kinds = settings.selected_reports();
    if kinds.is_empty() {
        tracing::info!("No report requested");
        return Ok(());
    }

    let sessions_path = config.sessions.resolved_path();
    let sessions = load_sessions(&sessions_path, &config.sessions)
        .with_context(|| format!("loading sessions from {}", sessions_path.display()))?;

    let mut pipeline = ReportPipeline::new(&config, &data_dir, settings.period(), sessions);
    let reports = pipeline
        .run(&kinds)
        .with_context(|| format!("building reports for {}", config.account_name))?;

    for report in &reports {
        println!("{}", display::render_report(report));
    }
    tracing::info!("{} reports written to {}", reports.len(), data_dir.display());

    Ok(())
}

/// Convert one PDF into the configured data directory, or beside the PDF.
fn convert_single(pdf: &Path, config: &ReportConfig) -> Result<()> {
    let converter = LedgerConverter::from_config(PdfToText::default(), config)?;
    let outdir = match config.data_dir {
        Some(_) => Some(bootstrap::data_dir(config, None)?),
        None => None,
    };
    match converter
        .convert(pdf, &config.account_name, outdir.as_deref())
        .with_context(|| format!("converting {}", pdf.display()))?
    {
        Some(csv) => println!("Wrote {}", csv.display()),
        None => println!("No data found for: {}", config.account_name),
    }
    Ok(())
}
