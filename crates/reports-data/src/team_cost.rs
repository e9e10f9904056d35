//! Modem credit per session hour, broken down by team.

use reports_core::calculations::RateCalculator;
use reports_core::models::LedgerEntry;
use reports_core::series::PivotTable;

/// One team's share of modem credit against its session hours.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamCost {
    pub team: String,
    /// Sum of ledger amounts whose description names the team.
    pub modem_credit: f64,
    /// Total hours in the team's pivot column.
    pub session_hours: f64,
    /// `modem_credit / session_hours`; `None` when the team has no hours.
    pub rate: Option<f64>,
}

/// Stateless helper pairing ledger credit with team hours.
pub struct TeamCostCalculator;

impl TeamCostCalculator {
    /// One [`TeamCost`] per pivot column, in column order.
    ///
    /// An entry counts toward every team whose name occurs in its description,
    /// compared case-insensitively.
    pub fn per_team(pivot: &PivotTable, expenses: &[LedgerEntry]) -> Vec<TeamCost> {
        let descriptions: Vec<String> = expenses
            .iter()
            .map(|e| e.description.to_lowercase())
            .collect();

        pivot
            .categories()
            .iter()
            .map(|team| {
                let needle = team.to_lowercase();
                let modem_credit: f64 = expenses
                    .iter()
                    .zip(&descriptions)
                    .filter(|(_, description)| description.contains(&needle))
                    .map(|(entry, _)| entry.amount)
                    .sum();
                let session_hours = pivot.column_total(team);
                TeamCost {
                    team: team.clone(),
                    modem_credit,
                    session_hours,
                    rate: RateCalculator::average_rate(modem_credit, session_hours),
                }
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
