//! Report pipeline.
//!
//! Builds each requested report from loaded sessions and, when a report
//! needs them, the cleaned ledger. Every report is also written as
//! `<title>.csv` in the data directory.

use std::path::{Path, PathBuf};

use reports_core::calendar::Period;
use reports_core::error::Result;
use reports_core::models::{LedgerEntry, SessionFormat, SessionRecord};
use reports_core::series::{AggregatedSeries, PivotTable};
use reports_core::settings::{ReportConfig, ReportKind};
use tracing::info;

use crate::aggregator::TimeSeriesAggregator;
use crate::artifacts::{
    write_comparison_csv, write_pivot_csv, write_series_csv, write_team_cost_csv,
};
use crate::comparison::{ComparisonJoiner, ComparisonRow};
use crate::expenses::{combined_csv_name, load_ledger, write_combined_csv, ExpenseCleaner};
use crate::pivot::CategoryPivotBuilder;
use crate::sessions::{with_format, without_teams};
use crate::team_cost::{TeamCost, TeamCostCalculator};

// ── Public types ──────────────────────────────────────────────────────────────

/// The data behind one report.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutput {
    /// Session hours per bucket (remote or face-to-face).
    Hours(AggregatedSeries),
    /// Remote hours per bucket and team.
    Teams(PivotTable),
    /// Remote hours against modem credit.
    ModemRate(Vec<ComparisonRow>),
    /// Modem credit per remote hour, per team.
    TeamCost(Vec<TeamCost>),
}

/// A built report and where its CSV went.
#[derive(Debug, Clone)]
pub struct Report {
    pub kind: ReportKind,
    pub output: ReportOutput,
    pub artifact: Option<PathBuf>,
}

impl Report {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

/// `<data_dir>/<title>.csv`.
pub fn report_csv_path(data_dir: &Path, kind: ReportKind) -> PathBuf {
    data_dir.join(format!("{}.csv", kind.title()))
}

// ── ReportPipeline ────────────────────────────────────────────────────────────

/// Holds one run's inputs and builds reports from them on demand.
///
/// The ledger is read, cleaned and written out as the combined CSV the first
/// time a report needs it, and reused afterwards.
pub struct ReportPipeline<'a> {
    config: &'a ReportConfig,
    data_dir: PathBuf,
    period: Period,
    sessions: Vec<SessionRecord>,
    expenses: Option<Vec<LedgerEntry>>,
}

impl<'a> ReportPipeline<'a> {
    pub fn new(
        config: &'a ReportConfig,
        data_dir: impl Into<PathBuf>,
        period: Period,
        sessions: Vec<SessionRecord>,
    ) -> Self {
        Self {
            config,
            data_dir: data_dir.into(),
            period,
            sessions,
            expenses: None,
        }
    }

    /// Build every report in `kinds` and write its CSV.
    pub fn run(&mut self, kinds: &[ReportKind]) -> Result<Vec<Report>> {
        let mut reports = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            let mut report = self.build(kind)?;
            let path = report_csv_path(&self.data_dir, kind);
            write_report_csv(&report.output, &path)?;
            info!("{} ({}): wrote {}", kind.title(), self.period_of(kind), path.display());
            report.artifact = Some(path);
            reports.push(report);
        }
        Ok(reports)
    }

    /// Bucket granularity `kind` is built with.
    pub fn period_of(&self, kind: ReportKind) -> Period {
        match kind {
            ReportKind::Remote | ReportKind::Local => self.period,
            ReportKind::Teams | ReportKind::ModemRate | ReportKind::HourlyModemCost => {
                Period::Monthly
            }
        }
    }

    /// Build one report without writing anything but the combined ledger.
    pub fn build(&mut self, kind: ReportKind) -> Result<Report> {
        let output = match kind {
            ReportKind::Remote => {
                ReportOutput::Hours(self.hours(SessionFormat::Remote, self.period))
            }
            ReportKind::Local => {
                ReportOutput::Hours(self.hours(SessionFormat::InPerson, self.period))
            }
            ReportKind::Teams => ReportOutput::Teams(self.teams_pivot()),
            ReportKind::ModemRate => {
                self.ensure_expenses()?;
                let hours = self.hours(SessionFormat::Remote, Period::Monthly);
                let credit =
                    TimeSeriesAggregator::aggregate_ledger(self.expenses(), Period::Monthly);
                ReportOutput::ModemRate(ComparisonJoiner::join(&hours, &credit))
            }
            ReportKind::HourlyModemCost => {
                self.ensure_expenses()?;
                let pivot = self.teams_pivot();
                ReportOutput::TeamCost(TeamCostCalculator::per_team(&pivot, self.expenses()))
            }
        };
        Ok(Report {
            kind,
            output,
            artifact: None,
        })
    }

    fn hours(&self, format: SessionFormat, period: Period) -> AggregatedSeries {
        TimeSeriesAggregator::aggregate_sessions(&with_format(&self.sessions, format), period)
    }

    /// Remote hours per month and team; the team reports are always monthly.
    fn teams_pivot(&self) -> PivotTable {
        let remote = with_format(&self.sessions, SessionFormat::Remote);
        let attributed = without_teams(&remote, &self.config.team_exclusions);
        CategoryPivotBuilder::build(&attributed, Period::Monthly)
    }

    fn ensure_expenses(&mut self) -> Result<()> {
        if self.expenses.is_some() {
            return Ok(());
        }
        let raw = load_ledger(&self.data_dir, self.config)?;
        let cleaned = ExpenseCleaner::from_config(self.config).clean(raw);

        let combined = self.data_dir.join(combined_csv_name(&self.config.account_name));
        write_combined_csv(&cleaned, &combined)?;
        info!("{} ledger rows kept; wrote {}", cleaned.len(), combined.display());

        self.expenses = Some(cleaned);
        Ok(())
    }

    fn expenses(&self) -> &[LedgerEntry] {
        self.expenses.as_deref().unwrap_or_default()
    }
}

/// Serialize a report's data to `path`.
pub fn write_report_csv(output: &ReportOutput, path: &Path) -> Result<()> {
    match output {
        ReportOutput::Hours(series) => write_series_csv(series, "Session hours", path),
        ReportOutput::Teams(table) => write_pivot_csv(table, path),
        ReportOutput::ModemRate(rows) => write_comparison_csv(rows, path),
        ReportOutput::TeamCost(costs) => write_team_cost_csv(costs, path),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
