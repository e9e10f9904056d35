use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::calendar::Period;
use crate::error::{ReportError, Result};

/// Ledger account extracted when none is named on the command line.
pub const DEFAULT_ACCOUNT_NAME: &str = "Bangui Internet: Communications";

/// File name of the session export inside the downloads folder.
pub const DEFAULT_SESSION_EXPORT: &str =
    "SIL CAR services reporting (Responses) - Form Responses 2.csv";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Generate usage and cost reports from SIL CAR services data
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "service-reports",
    about = "Generate reports from SIL CAR services data",
    version
)]
pub struct Settings {
    /// Produce all configured reports
    #[arg(long)]
    pub all: bool,

    /// Report the team's hourly modem cost
    #[arg(long)]
    pub hourly_modem_cost: bool,

    /// Report session hours from local face-to-face sessions
    #[arg(long)]
    pub local: bool,

    /// Report modem cost per remote session hour
    #[arg(long)]
    pub modem_rate: bool,

    /// Report session hours from remote sessions
    #[arg(long)]
    pub remote: bool,

    /// Report each team's monthly remote session hours
    #[arg(long)]
    pub teams: bool,

    /// Use yearly buckets instead of monthly
    #[arg(long, short = 'y')]
    pub yearly: bool,

    /// Convert a single ledger PDF to CSV and exit
    #[arg(long, value_name = "FILE")]
    pub pdf: Option<PathBuf>,

    /// Ledger account to extract (overrides the configured account)
    #[arg(long)]
    pub account: Option<String>,

    /// Configuration file (default: ~/.service-reports/config.json)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the ledger PDF reports
    #[arg(long, value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Directory receiving ledger CSVs and derived reports
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Session export CSV
    #[arg(long, value_name = "FILE")]
    pub sessions: Option<PathBuf>,

    /// Skip converting ledger PDFs; reuse the CSVs already in the data directory
    #[arg(long)]
    pub no_extract: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    pub write_config: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// One report the CLI can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    HourlyModemCost,
    Local,
    ModemRate,
    Remote,
    Teams,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::HourlyModemCost,
        ReportKind::Local,
        ReportKind::ModemRate,
        ReportKind::Remote,
        ReportKind::Teams,
    ];

    /// Title used for printed tables and derived CSV file names.
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::HourlyModemCost => "Modem Credit per Remote Session Hour",
            ReportKind::Local => "SIL CAR Face-to-Face Session Hours",
            ReportKind::ModemRate => "SIL CAR Modem Cost per Remote Session Hour",
            ReportKind::Remote => "SIL CAR Remote Session Hours",
            ReportKind::Teams => "ACATBA Teams' Remote Session Hours",
        }
    }
}

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    pub fn period(&self) -> Period {
        if self.yearly {
            Period::Yearly
        } else {
            Period::Monthly
        }
    }

    /// Every requested report, once each, in a fixed order.
    ///
    /// Flags are independent; any combination (including none) is valid.
    pub fn selected_reports(&self) -> Vec<ReportKind> {
        ReportKind::ALL
            .into_iter()
            .filter(|kind| {
                self.all
                    || match kind {
                        ReportKind::HourlyModemCost => self.hourly_modem_cost,
                        ReportKind::Local => self.local,
                        ReportKind::ModemRate => self.modem_rate,
                        ReportKind::Remote => self.remote,
                        ReportKind::Teams => self.teams,
                    }
            })
            .collect()
    }

    /// Path of the configuration file this run reads.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(ReportConfig::config_path)
    }

    /// Load the configuration file and layer the CLI overrides on top.
    pub fn resolve_config(&self) -> Result<ReportConfig> {
        let mut config = ReportConfig::load_from(&self.config_path())?;
        if let Some(account) = &self.account {
            config.account_name = account.clone();
        }
        if let Some(dir) = &self.reports_dir {
            config.reports_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(path) = &self.sessions {
            config.sessions.path = Some(path.clone());
        }
        Ok(config)
    }
}

// ── ReportConfig ───────────────────────────────────────────────────────────────

/// Column positions of a normalized ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerColumns {
    pub date: usize,
    pub description: usize,
    pub source: usize,
    pub reference: usize,
    pub amount: usize,
}

impl Default for LedgerColumns {
    fn default() -> Self {
        Self {
            date: 0,
            description: 1,
            source: 2,
            reference: 3,
            amount: 4,
        }
    }
}

/// Ledger field an exclusion rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerField {
    Description,
    Source,
    Reference,
}

/// How an exclusion rule's pattern is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Pattern occurs anywhere in the field.
    Contains,
    /// Field starts with the pattern.
    Prefix,
}

/// One expense exclusion rule.
///
/// ```json
/// { "field": "description", "match": "contains", "pattern": "flybox" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub field: LedgerField,
    #[serde(rename = "match")]
    pub kind: MatchKind,
    pub pattern: String,
    #[serde(default = "default_true")]
    pub ignore_case: bool,
}

impl ExclusionRule {
    pub fn new(field: LedgerField, kind: MatchKind, pattern: &str) -> Self {
        Self {
            field,
            kind,
            pattern: pattern.to_string(),
            ignore_case: true,
        }
    }

    /// Whether `value` is excluded by this rule. Empty patterns never match.
    pub fn matches(&self, value: &str) -> bool {
        if self.pattern.is_empty() {
            return false;
        }
        let (value, pattern) = if self.ignore_case {
            (value.to_lowercase(), self.pattern.to_lowercase())
        } else {
            (value.to_string(), self.pattern.clone())
        };
        match self.kind {
            MatchKind::Contains => value.contains(&pattern),
            MatchKind::Prefix => value.starts_with(&pattern),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Shape of the session export CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionExportConfig {
    /// Export location; `None` means the default downloads file.
    pub path: Option<PathBuf>,
    pub date_column: usize,
    pub team_column: usize,
    pub duration_column: usize,
    pub format_column: usize,
    pub date_format: String,
    pub remote_prefix: String,
    pub in_person_prefix: String,
}

impl Default for SessionExportConfig {
    fn default() -> Self {
        Self {
            path: None,
            date_column: 2,
            team_column: 3,
            duration_column: 6,
            format_column: 7,
            date_format: "%m/%d/%Y".to_string(),
            remote_prefix: "Remote".to_string(),
            in_person_prefix: "In person".to_string(),
        }
    }
}

impl SessionExportConfig {
    /// Configured export path, or `~/Téléchargements/<default export name>`.
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Téléchargements")
            .join(DEFAULT_SESSION_EXPORT)
    }
}

/// Every tunable of a report run, persisted as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Ledger account whose entries are extracted.
    pub account_name: String,
    /// Fixed sub-code following the 5-digit account code, e.g. `R51057`.
    pub account_code_suffix: String,
    /// Token opening every ledger entry line, e.g. `GLJE`.
    pub entry_marker: String,
    /// Only PDFs whose name contains this text are converted in batch runs.
    pub pdf_name_filter: String,
    /// `strftime` format of ledger dates.
    pub ledger_date_format: String,
    pub ledger_columns: LedgerColumns,
    /// Rows matching any rule are dropped from the expense series.
    pub expense_exclusions: Vec<ExclusionRule>,
    /// Teams whose name starts with one of these are left out of team reports.
    pub team_exclusions: Vec<String>,
    pub sessions: SessionExportConfig,
    /// Ledger PDF directory; discovered under `search_root` when unset.
    pub reports_dir: Option<PathBuf>,
    /// Output directory; defaults to `GL Data` beside the reports directory.
    pub data_dir: Option<PathBuf>,
    /// Where to look for a `GL Reports` folder; defaults to `~/Drive`.
    pub search_root: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        use LedgerField::{Description, Source};
        use MatchKind::{Contains, Prefix};

        Self {
            account_name: DEFAULT_ACCOUNT_NAME.to_string(),
            account_code_suffix: "R51057".to_string(),
            entry_marker: "GLJE".to_string(),
            pdf_name_filter: "Bangui Internet-donor".to_string(),
            ledger_date_format: "%d-%b-%y".to_string(),
            ledger_columns: LedgerColumns::default(),
            expense_exclusions: vec![
                // Modem equipment purchases, not airtime.
                ExclusionRule::new(Description, Contains, "flybox"),
                ExclusionRule::new(Description, Contains, "bloosat"),
                // One-time trial credits.
                ExclusionRule::new(Description, Prefix, "Telecel credit for Internet Nate Marti"),
                ExclusionRule::new(Description, Prefix, "100 GB Telecel Internet credit via Nate"),
                // Internal accounting transfers.
                ExclusionRule::new(Source, Prefix, "CAR ITR USD"),
                ExclusionRule::new(Source, Prefix, "Ecobank"),
                ExclusionRule::new(Source, Prefix, "ParCS"),
            ],
            team_exclusions: vec!["IT and Language Technology services, ACATBA".to_string()],
            sessions: SessionExportConfig::default(),
            reports_dir: None,
            data_dir: None,
            search_root: None,
        }
    }
}

impl ReportConfig {
    /// Default config file: `~/.service-reports/config.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".service-reports").join("config.json")
    }

    /// Load the configuration from `path`.
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is an error, so a typo never silently drops exclusion rules.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No configuration at {}; using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ReportError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Atomically write the configuration to `path`, creating parents.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let write_err = |source| ReportError::FileWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json).map_err(write_err)?;
        std::fs::rename(&tmp, path).map_err(write_err)?;
        Ok(())
    }

    /// Configured search root for the reports directory, or `~/Drive`.
    pub fn resolved_search_root(&self) -> PathBuf {
        self.search_root.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Drive")
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
