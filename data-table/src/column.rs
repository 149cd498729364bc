//! Typed column definitions. A column knows how to render a row into a
//! display cell and, separately, into a plain export value; the engine
//! never looks inside the row type.

use chrono::{DateTime, NaiveDate, Utc};
use client_core::format::{format_currency, format_date, format_datetime, format_phone};
use std::sync::Arc;

type CellFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Currency,
    Date,
    DateTime,
    Phone,
    Boolean,
    Status,
    Badge,
}

impl ColumnKind {
    /// Display values of decorated kinds may embed markup, so exporting
    /// them needs a dedicated plain-text extractor.
    fn is_plain(&self) -> bool {
        !matches!(self, ColumnKind::Status | ColumnKind::Badge)
    }
}

pub struct Column<T> {
    pub id: String,
    pub label: String,
    pub kind: ColumnKind,
    pub sortable: bool,
    cell_value: CellFn<T>,
    export_value: Option<CellFn<T>>,
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            kind: self.kind,
            sortable: self.sortable,
            cell_value: Arc::clone(&self.cell_value),
            export_value: self.export_value.as_ref().map(Arc::clone),
        }
    }
}

impl<T> Column<T> {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: ColumnKind,
        cell_value: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            sortable: true,
            cell_value: Arc::new(cell_value),
            export_value: None,
        }
    }

    pub fn text(
        id: impl Into<String>,
        label: impl Into<String>,
        cell_value: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self::new(id, label, ColumnKind::Text, cell_value)
    }

    pub fn number(
        id: impl Into<String>,
        label: impl Into<String>,
        value: impl Fn(&T) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self::new(id, label, ColumnKind::Number, move |row| {
            value(row).to_string()
        })
    }

    pub fn currency(
        id: impl Into<String>,
        label: impl Into<String>,
        value: impl Fn(&T) -> f64 + Send + Sync + 'static,
    ) -> Self {
        let raw = Arc::new(value);
        let for_export = Arc::clone(&raw);
        Self::new(id, label, ColumnKind::Currency, move |row| {
            format_currency(raw(row))
        })
        // Export the bare amount so spreadsheets treat it as a number;
        // three decimals matches the dinar's fils precision.
        .with_export_value(move |row| format!("{:.3}", for_export(row)))
    }

    pub fn date(
        id: impl Into<String>,
        label: impl Into<String>,
        value: impl Fn(&T) -> Option<NaiveDate> + Send + Sync + 'static,
    ) -> Self {
        Self::new(id, label, ColumnKind::Date, move |row| {
            value(row).map(format_date).unwrap_or_default()
        })
    }

    pub fn datetime(
        id: impl Into<String>,
        label: impl Into<String>,
        value: impl Fn(&T) -> Option<DateTime<Utc>> + Send + Sync + 'static,
    ) -> Self {
        Self::new(id, label, ColumnKind::DateTime, move |row| {
            value(row).map(format_datetime).unwrap_or_default()
        })
    }

    pub fn phone(
        id: impl Into<String>,
        label: impl Into<String>,
        value: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self::new(id, label, ColumnKind::Phone, move |row| {
            format_phone(&value(row))
        })
    }

    /// Boolean rendered as the Arabic yes/no pair.
    pub fn boolean(
        id: impl Into<String>,
        label: impl Into<String>,
        value: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::new(id, label, ColumnKind::Boolean, move |row| {
            if value(row) { "نعم" } else { "لا" }.to_string()
        })
    }

    pub fn with_export_value(
        mut self,
        export_value: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        self.export_value = Some(Arc::new(export_value));
        self
    }

    pub fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn display_value(&self, row: &T) -> String {
        (self.cell_value)(row)
    }

    /// Plain-text value for export. Falls back to the display value for
    /// plain kinds; decorated kinds without an extractor export empty
    /// rather than leak markup into the file.
    pub fn export_value(&self, row: &T) -> String {
        match &self.export_value {
            Some(f) => f(row),
            None if self.kind.is_plain() => self.display_value(row),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        amount: f64,
        active: bool,
    }

    #[test]
    fn currency_column_splits_display_and_export() {
        let col: Column<Row> = Column::currency("amount", "المبلغ", |r: &Row| r.amount);
        let row = Row {
            amount: 1234.5,
            active: true,
        };
        assert_eq!(col.display_value(&row), "1,234.500 د.ك");
        assert_eq!(col.export_value(&row), "1234.500");
    }

    #[test]
    fn badge_without_extractor_exports_empty() {
        let col: Column<Row> = Column::new("state", "الحالة", ColumnKind::Badge, |r: &Row| {
            format!("<span class=\"badge\">{}</span>", r.active)
        });
        let row = Row {
            amount: 0.0,
            active: true,
        };
        assert!(col.display_value(&row).contains("<span"));
        assert_eq!(col.export_value(&row), "");
    }

    #[test]
    fn boolean_column_renders_arabic() {
        let col: Column<Row> = Column::boolean("active", "نشط", |r: &Row| r.active);
        assert_eq!(
            col.display_value(&Row {
                amount: 0.0,
                active: true
            }),
            "نعم"
        );
    }
}
