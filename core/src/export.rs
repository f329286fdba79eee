//! Rendering records as JSON or CSV

use crate::error::ListsError;
use crate::record::{Record, cell_text};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Output format for an export
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Pretty-printed JSON array
    #[default]
    Json,
    /// Comma-separated values with a header row
    Csv,
}

impl ExportFormat {
    /// Wire token
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ListsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(ListsError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Render `records` in `format`
///
/// # Errors
///
/// Returns `ListsError::Service` if JSON serialization fails
pub fn render(records: &[Record], format: ExportFormat) -> Result<Vec<u8>, ListsError> {
    match format {
        ExportFormat::Json => serde_json::to_vec_pretty(records)
            .map_err(|e| ListsError::Service(format!("failed to serialize export: {e}"))),
        ExportFormat::Csv => Ok(render_csv(records).into_bytes()),
    }
}

/// Column headers: every key across `records` in first-seen order
#[must_use]
fn csv_headers(records: &[Record]) -> Vec<&str> {
    let mut headers: Vec<&str> = Vec::new();
    for key in records.iter().flat_map(Record::keys) {
        if !headers.contains(&key.as_str()) {
            headers.push(key);
        }
    }
    headers
}

fn render_csv(records: &[Record]) -> String {
    let headers = csv_headers(records);
    if headers.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    push_row(&mut out, headers.iter().map(|h| escape_csv_field(h)));

    for record in records {
        push_row(
            &mut out,
            headers.iter().map(|key| {
                record
                    .get(*key)
                    .map(|value| escape_csv_field(&cell_text(value)))
                    .unwrap_or_default()
            }),
        );
    }

    out
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>) {
    let row: Vec<String> = cells.collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

/// Quote a CSV field if it contains a delimiter, quote or line break
#[must_use]
pub fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
