//! CSV import: a quoted-field-aware parser plus a header mapper that
//! turns label columns back into column ids. Parsing never touches
//! table state; the caller decides what to do with the rows.

use crate::column::Column;
use std::collections::HashMap;

/// One imported record, keyed by column id.
pub type ImportedRow = HashMap<String, String>;

/// Parse CSV text against a column set. The header row is matched
/// against column labels (exact) or ids; unmatched header cells are
/// dropped. A leading BOM is ignored.
pub fn parse_csv<T>(columns: &[Column<T>], text: &str) -> Vec<ImportedRow> {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let mut records = parse_records(text).into_iter();

    let Some(header) = records.next() else {
        return Vec::new();
    };

    // Header position -> column id.
    let mapping: Vec<Option<String>> = header
        .iter()
        .map(|cell| {
            let cell = cell.trim();
            let hit = columns
                .iter()
                .find(|c| c.label == cell || c.id == cell)
                .map(|c| c.id.clone());
            if hit.is_none() {
                tracing::warn!(header = cell, "unrecognized import column, skipping");
            }
            hit
        })
        .collect();

    records
        .filter(|record| record.iter().any(|cell| !cell.trim().is_empty()))
        .map(|record| {
            record
                .into_iter()
                .zip(mapping.iter())
                .filter_map(|(value, id)| id.clone().map(|id| (id, value)))
                .collect()
        })
        .collect()
}

/// Split CSV text into records of fields. Handles quoted fields,
/// doubled quotes inside them, and CRLF or LF line endings.
fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;

    struct Row;

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column::text("name", "الاسم", |_: &Row| String::new()),
            Column::text("phone", "الهاتف", |_: &Row| String::new()),
        ]
    }

    #[test]
    fn maps_arabic_labels_to_column_ids() {
        let rows = parse_csv(
            &columns(),
            "الاسم,الهاتف\r\nأحمد,+96550123456\r\nخالد,+96550654321\r\n",
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "أحمد");
        assert_eq!(rows[1]["phone"], "+96550654321");
    }

    #[test]
    fn quoted_fields_keep_commas_and_doubled_quotes() {
        let rows = parse_csv(
            &columns(),
            "name,phone\n\"شركة ألف, فرع حولي\",\"قال \"\"مرحبا\"\"\"\n",
        );
        assert_eq!(rows[0]["name"], "شركة ألف, فرع حولي");
        assert_eq!(rows[0]["phone"], "قال \"مرحبا\"");
    }

    #[test]
    fn bom_and_blank_lines_are_ignored() {
        let rows = parse_csv(&columns(), "\u{FEFF}name,phone\nأحمد,123\n\n");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn unknown_headers_are_dropped() {
        let rows = parse_csv(&columns(), "name,mystery\nأحمد,42\n");
        assert_eq!(rows[0].get("name").map(String::as_str), Some("أحمد"));
        assert!(!rows[0].contains_key("mystery"));
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(parse_csv(&columns(), "").is_empty());
    }
}
