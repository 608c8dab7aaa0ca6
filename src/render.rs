use crate::pipeline::TickerOutcome;
use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use core_types::{Horizon, Interval};

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn price(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:+.2}%"))
}

fn number(value: f64) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

/// Key/value summary of a single ticker.
pub fn outcome_table(outcome: &TickerOutcome) -> Table {
    let report = &outcome.report;
    let snapshot = report.snapshot.as_ref();
    let mut table = base_table();
    table.set_header(vec![Cell::new(&outcome.symbol), Cell::new(&outcome.column)]);

    let date_range = match (report.start, report.end) {
        (Some(start), Some(end)) => format!("{} .. {}", start.date(), end.date()),
        _ => "-".to_string(),
    };

    table.add_row(vec![Cell::new("Period"), Cell::new(date_range)]);
    table.add_row(vec![
        Cell::new("Rows (raw / cleaned)"),
        Cell::new(format!("{} / {}", outcome.raw_rows, outcome.cleaned_rows)),
    ]);
    table.add_row(vec![
        Cell::new("Missing before cleaning"),
        Cell::new(outcome.missing_before_cleaning),
    ]);
    table.add_row(vec![
        Cell::new("IQR outliers / return outliers"),
        Cell::new(format!("{} / {}", outcome.iqr_outliers, outcome.return_outliers)),
    ]);
    table.add_row(vec![Cell::new("Last close"), Cell::new(price(snapshot.map(|s| s.close)))]);
    table.add_row(vec![
        Cell::new("Change"),
        Cell::new(format!(
            "{} ({})",
            price(snapshot.map(|s| s.change)),
            percent(snapshot.and_then(|s| s.change_pct))
        )),
    ]);

    for (window, value) in report.latest_sma() {
        table.add_row(vec![Cell::new(format!("SMA {window}")), Cell::new(price(value))]);
    }

    table.add_row(vec![
        Cell::new("Longest up / down streak"),
        Cell::new(format!("{} / {}", report.streak.longest_up, report.streak.longest_down)),
    ]);
    table.add_row(vec![
        Cell::new("Max profit (trades)"),
        Cell::new(format!("{:.2} ({})", report.max_profit, report.trades.len())),
    ]);
    table
}

/// Cross-ticker ranking, already ordered by the caller.
pub fn ranking_table(ranked: &[TickerOutcome]) -> Table {
    let mut table = base_table();
    table.set_header(vec!["#", "Symbol", "Last close", "Change", "Up", "Down", "Max profit"]);

    for (rank, outcome) in ranked.iter().enumerate() {
        let report = &outcome.report;
        let snapshot = report.snapshot.as_ref();
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&outcome.symbol),
            Cell::new(price(snapshot.map(|s| s.close))).set_alignment(CellAlignment::Right),
            Cell::new(percent(snapshot.and_then(|s| s.change_pct)))
                .set_alignment(CellAlignment::Right),
            Cell::new(report.streak.longest_up),
            Cell::new(report.streak.longest_down),
            number(report.max_profit),
        ]);
    }
    table
}

/// One row per interval the horizon offers, the selected one marked.
pub fn intervals_table(horizon: Horizon, start: NaiveDate, end: NaiveDate, selected: Interval) -> Table {
    let mut table = base_table();
    table.set_header(vec!["Horizon", "From", "To", "Interval", "Intraday", "Selected"]);

    for interval in horizon.intervals() {
        table.add_row(vec![
            Cell::new(horizon.label()),
            Cell::new(start),
            Cell::new(end),
            Cell::new(interval),
            Cell::new(if interval.is_intraday() { "yes" } else { "no" }),
            Cell::new(if *interval == selected { "*" } else { "" }),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_table_lists_every_offered_interval() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let table = intervals_table(Horizon::FiveDays, start, end, Interval::OneDay);

        assert_eq!(table.row_iter().count(), Horizon::FiveDays.intervals().len());
        let last = table.row_iter().last().unwrap();
        let cells: Vec<String> = last.cell_iter().map(|cell| cell.content()).collect();
        assert_eq!(cells[3..], ["1d", "no", "*"]);
        let first = table.row_iter().next().unwrap();
        assert_eq!(first.cell_iter().nth(4).unwrap().content(), "yes");
    }
}
