use anyhow::Context;
use chrono::NaiveDateTime;
use core_types::{CoreError, PriceTable, parse_timestamp};
use std::path::Path;

/// Cell contents treated as a missing value.
const MISSING_TOKENS: &[&str] = &["", "nan", "NaN", "null", "NULL", "N/A", "-"];

fn is_missing_token(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell)
}

/// Reads a provider CSV export into a `PriceTable`.
///
/// Rows are sorted by timestamp and repeated timestamps keep their first row;
/// both repairs are logged. Columns whose first non-empty cell is not a number
/// (symbol, sector and similar labels) are skipped. Inside a numeric column an
/// unparseable cell is an error.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn load_price_table(path: &Path, timestamp_column: &str) -> anyhow::Result<PriceTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let timestamp_index = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(timestamp_column))
        .ok_or_else(|| CoreError::MissingColumns(vec![timestamp_column.to_string()]))?;

    let mut rows: Vec<(NaiveDateTime, csv::StringRecord)> = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed row {}", line + 1))?;
        let raw = record.get(timestamp_index).unwrap_or_default();
        let timestamp =
            parse_timestamp(raw).with_context(|| format!("Bad timestamp on row {}", line + 1))?;
        rows.push((timestamp, record));
    }

    if !rows.is_sorted_by_key(|(timestamp, _)| *timestamp) {
        tracing::info!(rows = rows.len(), "Rows were out of order, sorting by timestamp");
        rows.sort_by_key(|(timestamp, _)| *timestamp);
    }

    let before = rows.len();
    rows.dedup_by_key(|(timestamp, _)| *timestamp);
    if rows.len() < before {
        tracing::info!(dropped = before - rows.len(), "Dropped rows with duplicate timestamps");
    }

    let timestamps = rows.iter().map(|(timestamp, _)| *timestamp).collect();
    let mut table = PriceTable::new(timestamps)?;

    for (index, name) in headers.iter().enumerate() {
        if index == timestamp_index {
            continue;
        }

        let cells: Vec<&str> = rows
            .iter()
            .map(|(_, record)| record.get(index).unwrap_or_default())
            .collect();

        let is_numeric = cells
            .iter()
            .find(|cell| !is_missing_token(cell))
            .is_none_or(|cell| cell.parse::<f64>().is_ok());
        if !is_numeric {
            tracing::debug!(column = name, "Skipping non-numeric column");
            continue;
        }

        let values = cells
            .into_iter()
            .map(|cell| parse_cell(name, cell))
            .collect::<Result<Vec<_>, _>>()?;
        table.insert_column(name, values)?;
    }

    tracing::debug!(
        rows = table.len(),
        columns = ?table.column_names().collect::<Vec<_>>(),
        "Loaded price table"
    );
    Ok(table)
}

fn parse_cell(column: &str, cell: &str) -> Result<Option<f64>, CoreError> {
    if is_missing_token(cell) {
        return Ok(None);
    }

    match cell.parse::<f64>() {
        Ok(value) if value.is_nan() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(_) => Err(CoreError::InvalidNumber {
            column: column.to_string(),
            value: cell.to_string(),
        }),
    }
}
