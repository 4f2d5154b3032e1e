//! Pure rendering of listings and batch reports as table, JSON, or CSV text.

use serde_json::{json, Value};

use crate::batch::{BatchEntry, BatchReport, SubmissionOutcome};
use crate::cli::OutputFormat;
use crate::resource::ResourceKind;
use crate::validate::Validation;

const MAX_COL: usize = 32;

fn sanitize(s: &str) -> String {
    s.replace(['\t', '\n', '\r'], " ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(2)).collect();
    format!("{kept}..")
}

/// Aligned text table: dynamic column widths capped at a maximum, a dashed
/// rule under the header, cells truncated to fit. The last column is never
/// truncated: it carries identifiers and failure messages that must stay
/// readable in full.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let last = headers.len().saturating_sub(1);
    let display: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, cell)| {
                    let cell = sanitize(cell);
                    if i == last {
                        cell
                    } else {
                        truncate(&cell, MAX_COL)
                    }
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let cell_max = display
                .iter()
                .map(|row| row.get(i).map_or(0, |c| c.chars().count()))
                .max()
                .unwrap_or(0);
            h.chars().count().max(cell_max).min(MAX_COL.max(h.chars().count()))
        })
        .collect();

    let mut out = String::new();
    let header_line = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect::<Vec<_>>()
        .join(" ");
    out.push_str(header_line.trim_end());
    out.push('\n');
    out.push_str(&"-".repeat(header_line.chars().count()));

    for row in &display {
        out.push('\n');
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths.get(i).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(line.trim_end());
    }
    out
}

/// CSV with standard quoting: cells containing commas, quotes, or newlines are
/// wrapped in double quotes, inner quotes doubled.
pub fn render_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    fn cell(s: &str) -> String {
        if s.contains([',', '"', '\n', '\r']) {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }

    let mut lines = vec![headers.iter().map(|h| cell(h)).collect::<Vec<_>>().join(",")];
    for row in rows {
        lines.push(row.iter().map(|c| cell(c)).collect::<Vec<_>>().join(","));
    }
    lines.join("\n")
}

pub fn render_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).expect("serialize")
}

/// Renders a projected listing (already reduced to display strings).
/// JSON output of raw records is handled by the callers instead.
pub fn render_projected(headers: &[&str], rows: &[Vec<String>], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => render_table(headers, rows),
        OutputFormat::Csv => render_csv(headers, rows),
        OutputFormat::Json => {
            let objects: Vec<Value> = rows
                .iter()
                .map(|row| {
                    let mut map = serde_json::Map::new();
                    for (header, cell) in headers.iter().zip(row) {
                        map.insert((*header).to_string(), Value::String(cell.clone()));
                    }
                    Value::Object(map)
                })
                .collect();
            render_json(&Value::Array(objects))
        }
    }
}

fn entry_status(entry: &BatchEntry) -> (&'static str, String) {
    match (&entry.validation, &entry.outcome) {
        (Validation::Invalid { reason }, _) => ("invalid", reason.clone()),
        (Validation::Valid, None) => ("preview", String::new()),
        (Validation::Valid, Some(SubmissionOutcome::Created { id })) => ("created", id.clone()),
        (Validation::Valid, Some(SubmissionOutcome::Failed { error })) => ("failed", error.clone()),
    }
}

/// Renders a batch report. Every row appears with whichever of validation
/// reason, created identifier, or failure message applies; nothing is omitted.
pub fn render_report(report: &BatchReport, kind: ResourceKind, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        let entries: Vec<Value> = report
            .entries
            .iter()
            .map(|entry| {
                let (status, detail) = entry_status(entry);
                json!({
                    "fields": entry.row.to_json(),
                    "status": status,
                    "detail": detail,
                })
            })
            .collect();
        return render_json(&Value::Array(entries));
    }

    let mut headers: Vec<&str> = kind.report_fields().to_vec();
    headers.push("status");
    headers.push("detail");

    let rows: Vec<Vec<String>> = report
        .entries
        .iter()
        .map(|entry| {
            let mut row: Vec<String> = kind
                .report_fields()
                .iter()
                .map(|field| entry.row.get(field).unwrap_or("").to_string())
                .collect();
            let (status, detail) = entry_status(entry);
            row.push(status.to_string());
            row.push(detail);
            row
        })
        .collect();

    match format {
        OutputFormat::Csv => render_csv(&headers, &rows),
        _ => render_table(&headers, &rows),
    }
}

/// Field as display text; numbers print bare, null and missing as empty.
pub fn field_text(record: &Value, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Active column marker, matching the API's "1"/"0" (sometimes numeric).
pub fn active_mark(record: &Value) -> String {
    if field_text(record, "active") == "1" {
        "✓".to_string()
    } else {
        "✗".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Row;

    #[test]
    fn csv_quotes_cells_with_commas_and_quotes() {
        let rows = vec![vec!["info@example.com".to_string(), "a@x.com,b@x.com".to_string()]];
        let out = render_csv(&["address", "goto"], &rows);
        assert_eq!(out, "address,goto\ninfo@example.com,\"a@x.com,b@x.com\"");

        let rows = vec![vec!["say \"hi\"".to_string()]];
        let out = render_csv(&["name"], &rows);
        assert_eq!(out, "name\n\"say \"\"hi\"\"\"");
    }

    #[test]
    fn table_pads_columns_and_underlines_header() {
        let rows = vec![
            vec!["john".to_string(), "John Doe".to_string()],
            vec!["ana".to_string(), "Ana".to_string()],
        ];
        let out = render_table(&["local_part", "name"], &rows);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "local_part name");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].starts_with("john      "));
    }

    #[test]
    fn long_cells_are_truncated_with_ellipsis() {
        let long = "x".repeat(64);
        let out = render_table(&["goto", "status"], &[vec![long, "ok".to_string()]]);
        let data_line = out.lines().nth(2).unwrap();
        let goto_cell = data_line.split_whitespace().next().unwrap();
        assert_eq!(goto_cell.chars().count(), MAX_COL);
        assert!(goto_cell.ends_with(".."));
    }

    #[test]
    fn last_column_is_never_truncated() {
        let reason = "missing required field(s): user1, password1, username".to_string();
        let out = render_table(&["user1", "detail"], &[vec!["a".to_string(), reason.clone()]]);
        assert!(out.contains(&reason));
    }

    fn entry(validation: Validation, outcome: Option<SubmissionOutcome>) -> BatchEntry {
        BatchEntry {
            row: [("address", "info@example.com"), ("goto", "a@x.com")]
                .into_iter()
                .collect::<Row>(),
            validation,
            outcome,
        }
    }

    #[test]
    fn report_shows_every_row_with_its_fate() {
        let report = BatchReport {
            entries: vec![
                entry(
                    Validation::Valid,
                    Some(SubmissionOutcome::Created { id: "alias_added".to_string() }),
                ),
                entry(
                    Validation::Invalid { reason: "missing required field(s): goto".to_string() },
                    None,
                ),
                entry(
                    Validation::Valid,
                    Some(SubmissionOutcome::Failed { error: "object_exists".to_string() }),
                ),
            ],
        };

        let out = render_report(&report, ResourceKind::Alias, OutputFormat::Csv);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("created"));
        assert!(lines[2].contains("invalid"));
        assert!(lines[2].contains("goto"));
        assert!(lines[3].contains("failed"));
        assert!(lines[3].contains("object_exists"));
    }

    #[test]
    fn preview_report_rows_have_no_outcome_column_value() {
        let report = BatchReport {
            entries: vec![entry(Validation::Valid, None)],
        };
        let out = render_report(&report, ResourceKind::Alias, OutputFormat::Json);
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["status"], "preview");
        assert_eq!(parsed[0]["detail"], "");
    }

    #[test]
    fn field_text_handles_numbers_and_null() {
        let record = json!({"id": 7, "name": null, "domain": "example.com"});
        assert_eq!(field_text(&record, "id"), "7");
        assert_eq!(field_text(&record, "name"), "");
        assert_eq!(field_text(&record, "domain"), "example.com");
        assert_eq!(field_text(&record, "missing"), "");
    }
}
