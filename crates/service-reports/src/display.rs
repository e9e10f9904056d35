//! Plain-text tables for reports printed to stdout.

use reports_core::formatting::{format_hours, format_number, format_rate};
use reports_data::reports::{Report, ReportOutput};

/// Cell alignment within a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Title line, header, separator, rows, and a totals row where one makes sense.
pub fn render_report(report: &Report) -> String {
    let (header, rows) = table_cells(&report.output);
    let mut out = String::new();
    out.push_str(report.title());
    out.push('\n');
    if rows.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }
    out.push_str(&render_table(&header, &rows));
    out
}

fn table_cells(output: &ReportOutput) -> (Vec<String>, Vec<Vec<String>>) {
    match output {
        ReportOutput::Hours(series) => {
            let mut rows: Vec<Vec<String>> = series
                .iter()
                .map(|(bucket, hours)| vec![bucket.label(), format_hours(hours)])
                .collect();
            if !rows.is_empty() {
                rows.push(vec!["Total".to_string(), format_hours(series.total())]);
            }
            (strings(&["Period", "Session hours"]), rows)
        }
        ReportOutput::Teams(table) => {
            let mut header = vec!["Period".to_string()];
            header.extend(table.categories().iter().cloned());
            header.push("Total".to_string());

            let mut rows: Vec<Vec<String>> = table
                .rows()
                .map(|(bucket, cells)| {
                    let mut row = vec![bucket.label()];
                    row.extend(cells.iter().map(|hours| format_hours(*hours)));
                    row.push(format_hours(table.row_total(&bucket)));
                    row
                })
                .collect();
            if !rows.is_empty() {
                let mut totals = vec!["Total".to_string()];
                totals.extend(
                    table
                        .categories()
                        .iter()
                        .map(|team| format_hours(table.column_total(team))),
                );
                let grand: f64 = table.categories().iter().map(|t| table.column_total(t)).sum();
                totals.push(format_hours(grand));
                rows.push(totals);
            }
            (header, rows)
        }
        ReportOutput::ModemRate(rows) => {
            let body = rows
                .iter()
                .map(|row| {
                    vec![
                        row.bucket.label(),
                        format_hours(row.session_hours),
                        format_number(row.modem_credit, 0),
                        format_rate(row.rate_per_hour),
                        format_hours(row.cumulative_hours),
                        format_number(row.cumulative_credit, 0),
                        format_rate(row.cumulative_rate),
                    ]
                })
                .collect();
            let header = strings(&[
                "Period",
                "Session hours",
                "Modem credit",
                "FCFA/hr",
                "Cum. Hrs.",
                "Cum. Credit",
                "FCFA/hr-to-date",
            ]);
            (header, body)
        }
        ReportOutput::TeamCost(costs) => {
            let body = costs
                .iter()
                .map(|cost| {
                    vec![
                        cost.team.clone(),
                        format_number(cost.modem_credit, 0),
                        format_hours(cost.session_hours),
                        cost.rate
                            .map(|rate| format_number(rate, 0))
                            .unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect();
            (strings(&["Team", "Modem credit", "Session hours", "FCFA/hr"]), body)
        }
    }
}

fn render_table(header: &[String], rows: &[Vec<String>]) -> String {
    let columns = header.len();
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(columns) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }
    let align = |i: usize| if i == 0 { Align::Left } else { Align::Right };

    let mut out = String::new();
    push_line(&mut out, header, &widths, align);
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths, align);
    for row in rows {
        push_line(&mut out, row, &widths, align);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize], align: impl Fn(usize) -> Align) {
    let rendered: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| match align(i) {
            Align::Left => format!("{:<width$}", cell, width = *width),
            Align::Right => format!("{:>width$}", cell, width = *width),
        })
        .collect();
    out.push_str(rendered.join("  ").trim_end());
    out.push('\n');
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use reports_core::calendar::{CalendarBucket, Period};
    use reports_core::series::{AggregatedSeries, PivotTable};
    use reports_core::settings::ReportKind;
    use reports_data::comparison::ComparisonRow;

    fn report(kind: ReportKind, output: ReportOutput) -> Report {
        Report {
            kind,
            output,
            artifact: None,
        }
    }

    #[test]
    fn test_render_hours_with_total() {
        let mut series = AggregatedSeries::new(Period::Monthly);
        series.accumulate(CalendarBucket::Month { year: 2024, month: 1 }, 3.0);
        series.accumulate(CalendarBucket::Month { year: 2024, month: 2 }, 1.5);

        let text = render_report(&report(ReportKind::Remote, ReportOutput::Hours(series)));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "SIL CAR Remote Session Hours");
        assert!(lines[1].starts_with("Period"));
        assert!(lines[3].starts_with("January 2024"));
        assert!(lines[3].ends_with(" 3"));
        assert!(lines[4].ends_with("1.50"));
        assert!(lines[5].starts_with("Total"));
        assert!(lines[5].ends_with("4.50"));
    }

    #[test]
    fn test_render_modem_rate_shows_dash_for_unrated() {
        let rows = vec![ComparisonRow {
            bucket: CalendarBucket::Month { year: 2024, month: 3 },
            session_hours: 4.5,
            modem_credit: 9_000.0,
            rate_per_hour: None,
            cumulative_hours: 4.5,
            cumulative_credit: 9_000.0,
            cumulative_rate: None,
        }];
        let text = render_report(&report(ReportKind::ModemRate, ReportOutput::ModemRate(rows)));
        let data_line = text.lines().nth(3).unwrap();
        assert!(data_line.starts_with("March 2024"));
        assert!(data_line.contains("9,000"));
        assert!(data_line.ends_with('-'));
    }

    #[test]
    fn test_render_teams_has_total_column() {
        let mut table = PivotTable::new(Period::Monthly, vec!["TeamA".into(), "TeamB".into()]);
        table.accumulate(CalendarBucket::Month { year: 2024, month: 1 }, "TeamA", 3.0);
        table.accumulate(CalendarBucket::Month { year: 2024, month: 2 }, "TeamB", 3.0);

        let text = render_report(&report(ReportKind::Teams, ReportOutput::Teams(table)));
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].ends_with("Total"));
        assert_eq!(lines.last().map(|l| l.ends_with(" 6")), Some(true));
    }

    #[test]
    fn test_render_empty_report() {
        let text = render_report(&report(
            ReportKind::Local,
            ReportOutput::Hours(AggregatedSeries::new(Period::Yearly)),
        ));
        assert_eq!(text, "SIL CAR Face-to-Face Session Hours\n(no data)\n");
    }
}
