use anyhow::{Context, Result};
use colored::Colorize;
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

/// A report column: JSON key and header label.
pub type Column = (&'static str, &'static str);

pub const EMPLOYEE_COLUMNS: &[Column] = &[
    ("firstName", "First Name"),
    ("lastName", "Last Name"),
    ("email", "Email"),
    ("phone", "Phone"),
    ("employeeCode", "Employee Code"),
    ("position", "Position"),
    ("departmentName", "Department"),
    ("teamName", "Team"),
    ("joinDate", "Join Date"),
    ("status", "Status"),
];

pub const ATTENDANCE_COLUMNS: &[Column] = &[
    ("date", "Date"),
    ("checkInTime", "Check In Time"),
    ("checkInStatus", "Check In Status"),
    ("checkOutTime", "Check Out Time"),
    ("checkOutStatus", "Check Out Status"),
    ("totalHours", "Total Hours"),
    ("note", "Notes"),
];

pub const LEAVE_COLUMNS: &[Column] = &[
    ("id", "ID"),
    ("leaveType", "Leave Type"),
    ("startDate", "Start Date"),
    ("endDate", "End Date"),
    ("totalDays", "Total Days"),
    ("reason", "Reason"),
    ("approverName", "Approver"),
    ("status", "Status"),
    ("createdAt", "Submitted On"),
];

pub const OVERTIME_COLUMNS: &[Column] = &[
    ("id", "ID"),
    ("date", "Date"),
    ("startTime", "Start Time"),
    ("endTime", "End Time"),
    ("totalMinutes", "Minutes"),
    ("reason", "Reason"),
    ("status", "Status"),
];

pub const TEAM_COLUMNS: &[Column] = &[
    ("name", "Team Name"),
    ("departmentName", "Department"),
    ("managerName", "Manager"),
    ("memberCount", "Members"),
    ("description", "Description"),
];

pub const NOTIFICATION_COLUMNS: &[Column] = &[
    ("id", "ID"),
    ("title", "Title"),
    ("message", "Message"),
    ("isRead", "Read"),
    ("createdAt", "Created"),
];

const BOM: char = '\u{feff}';

pub fn print_value(value: &Value, columns: Option<&[Column]>, format: OutputFormat) -> Result<()> {
    println!("{}", render(value, columns, format)?);
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Renders a response in the requested format.
///
/// Lists are bare arrays or objects carrying an `items` or `data` array.
/// With `columns` unset, the keys of the first record are used.
pub fn render(value: &Value, columns: Option<&[Column]>, format: OutputFormat) -> Result<String> {
    let records = records(value);
    let text = match (format, records) {
        (OutputFormat::Json, _) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        (OutputFormat::Table, None) => key_value_table(value),
        (_, None) => value_text(value),
        (OutputFormat::Table, Some(records)) => {
            let (headers, rows) = tabulate(&records, columns);
            if rows.is_empty() {
                return Ok("No results found.".to_string());
            }
            let mut builder = Builder::default();
            builder.push_record(headers);
            for row in rows {
                builder.push_record(row);
            }
            let mut out = builder.build().with(Style::rounded()).to_string();
            if let Some(total) = value.get("totalCount").and_then(Value::as_u64) {
                out.push_str(&format!("\nTotal: {total}"));
            }
            out
        }
        (OutputFormat::Csv, Some(records)) => {
            let (headers, rows) = tabulate(&records, columns);
            to_csv(&headers, &rows)?
        }
        (OutputFormat::Tsv, Some(records)) => {
            let (headers, rows) = tabulate(&records, columns);
            to_tsv(&headers, &rows)?
        }
    };
    Ok(text)
}

fn records(value: &Value) -> Option<Vec<&Map<String, Value>>> {
    let list = match value {
        Value::Array(items) => items,
        Value::Object(obj) => ["items", "data"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_array))?,
        _ => return None,
    };
    Some(list.iter().filter_map(Value::as_object).collect())
}

fn tabulate(
    records: &[&Map<String, Value>],
    columns: Option<&[Column]>,
) -> (Vec<String>, Vec<Vec<String>>) {
    let keys: Vec<(String, String)> = match columns {
        Some(columns) => columns
            .iter()
            .map(|(key, label)| (key.to_string(), label.to_string()))
            .collect(),
        None => records
            .first()
            .map(|first| first.keys().map(|k| (k.clone(), k.clone())).collect())
            .unwrap_or_default(),
    };

    let headers = keys.iter().map(|(_, label)| label.clone()).collect();
    let rows = records
        .iter()
        .map(|record| {
            keys.iter()
                .map(|(key, _)| record.get(key).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();
    (headers, rows)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => cell_text(other),
    }
}

fn key_value_table(value: &Value) -> String {
    let Some(obj) = value.as_object() else {
        return value_text(value);
    };
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in obj {
        builder.push_record([key.clone(), value_text(val)]);
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Comma separated output. Cells containing a comma, quote or line break
/// are quoted with inner quotes doubled.
pub fn to_csv(headers: &[String], rows: &[Vec<String>]) -> Result<String> {
    let writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    write_records(writer, headers.iter().cloned(), rows, |cell| cell.clone())
}

/// Tab separated output prefixed with a UTF-8 BOM for spreadsheet programs.
pub fn to_tsv(headers: &[String], rows: &[Vec<String>]) -> Result<String> {
    let writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    let clean = |cell: &String| cell.replace(['\t', '\n', '\r'], " ");
    let body = write_records(writer, headers.iter().map(clean), rows, clean)?;
    Ok(format!("{BOM}{body}"))
}

fn write_records(
    mut writer: Writer<Vec<u8>>,
    headers: impl Iterator<Item = String>,
    rows: &[Vec<String>],
    cell: impl Fn(&String) -> String,
) -> Result<String> {
    let headers: Vec<String> = headers.collect();
    if !headers.is_empty() {
        writer.write_record(&headers)?;
    }
    for row in rows {
        writer.write_record(row.iter().map(&cell).collect::<Vec<_>>())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush export: {}", e.error()))?;
    let text = String::from_utf8(bytes).context("Export is not valid UTF-8")?;
    Ok(text.trim_end_matches('\n').to_string())
}
