//! Table export. CSV carries a UTF-8 BOM so Excel opens the Arabic
//! content correctly; the "Excel" variant is the tab-delimited
//! compatibility format the back office has always produced, not a
//! real workbook.

use crate::column::Column;
use crate::engine::TableEngine;

#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: String,
    pub content: String,
}

/// Export the filtered row set (all pages) as CSV.
pub fn export_csv<T>(engine: &TableEngine<T>, basename: &str) -> ExportFile {
    ExportFile {
        filename: format!("{}.csv", basename),
        content_type: "text/csv;charset=utf-8".to_string(),
        content: render(engine, ","),
    }
}

/// Tab-delimited export under an `.xlsx` name, kept for compatibility
/// with the existing download flow.
pub fn export_excel<T>(engine: &TableEngine<T>, basename: &str) -> ExportFile {
    ExportFile {
        filename: format!("{}.xlsx", basename),
        content_type: "application/vnd.ms-excel;charset=utf-8".to_string(),
        content: render(engine, "\t"),
    }
}

fn render<T>(engine: &TableEngine<T>, delimiter: &str) -> String {
    let mut out = String::new();
    out.push('\u{FEFF}');

    let columns = engine.columns();
    out.push_str(
        &columns
            .iter()
            .map(|c| quote_field(&c.label, delimiter))
            .collect::<Vec<_>>()
            .join(delimiter),
    );
    out.push_str("\r\n");

    for index in engine.filtered_indices() {
        let row = &engine.rows()[index];
        let line = columns
            .iter()
            .map(|c: &Column<T>| quote_field(&c.export_value(row), delimiter))
            .collect::<Vec<_>>()
            .join(delimiter);
        out.push_str(&line);
        out.push_str("\r\n");
    }
    out
}

/// Quote a field when it contains the delimiter, a quote, or a line
/// break; internal quotes are doubled.
fn quote_field(field: &str, delimiter: &str) -> String {
    if field.contains(delimiter) || field.contains('"') || field.contains('\n') || field.contains('\r')
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
