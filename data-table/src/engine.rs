//! The table engine: rows plus columns plus state, and the
//! deterministic pipeline that turns them into a page of cells.

use crate::column::Column;
use crate::state::{SortDirection, TableState};
use std::cmp::Ordering;

pub struct TableEngine<T> {
    columns: Vec<Column<T>>,
    rows: Vec<T>,
    state: TableState,
}

/// One computed page: row indices into the engine's row set, rendered
/// cells, and pagination metadata.
#[derive(Debug, Clone)]
pub struct TableView {
    pub rows: Vec<ViewRow>,
    pub total_rows: usize,
    pub page: usize,
    pub total_pages: usize,
    pub page_window: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct ViewRow {
    /// Index into the engine's backing row set.
    pub index: usize,
    pub cells: Vec<String>,
}

impl<T> TableEngine<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            state: TableState::default(),
        }
    }

    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.state.page = 1;
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&T> {
        self.rows.get(index)
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    // --- state mutations; every filter change resets to page 1 ---

    pub fn set_search(&mut self, search: &str) {
        self.state.search = search.to_string();
        self.state.page = 1;
    }

    pub fn set_column_filter(&mut self, column_id: &str, value: Option<&str>) {
        match value {
            Some(v) if !v.is_empty() => {
                self.state
                    .column_filters
                    .insert(column_id.to_string(), v.to_string());
            }
            _ => {
                self.state.column_filters.remove(column_id);
            }
        }
        self.state.page = 1;
    }

    /// Sort by a column; the same column again flips direction.
    /// Unsortable and unknown columns are ignored.
    pub fn set_sort(&mut self, column_id: &str) {
        let sortable = self
            .columns
            .iter()
            .any(|c| c.id == column_id && c.sortable);
        if !sortable {
            return;
        }
        self.state.sort = match &self.state.sort {
            Some((current, direction)) if current == column_id => {
                Some((column_id.to_string(), direction.toggled()))
            }
            _ => Some((column_id.to_string(), SortDirection::Asc)),
        };
        self.state.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.state.search.clear();
        self.state.column_filters.clear();
        self.state.sort = None;
        self.state.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size > 0 {
            self.state.page_size = page_size;
            self.state.page = 1;
        }
    }

    /// Page 0 and past-the-end pages are no-ops.
    pub fn set_page(&mut self, page: usize) {
        if page >= 1 && page <= self.total_pages() {
            self.state.page = page;
        }
    }

    pub fn total_pages(&self) -> usize {
        let filtered = self.filtered_indices().len();
        if filtered == 0 {
            1
        } else {
            (filtered + self.state.page_size - 1) / self.state.page_size
        }
    }

    /// Indices of rows surviving search and column filters, in sorted
    /// order. With no search, no filters, and no sort this is the
    /// identity over the input order.
    pub fn filtered_indices(&self) -> Vec<usize> {
        let needle = self.state.search.trim().to_lowercase();
        let mut indices: Vec<usize> = (0..self.rows.len())
            .filter(|&i| {
                let row = &self.rows[i];
                if !needle.is_empty() {
                    let hit = self
                        .columns
                        .iter()
                        .any(|c| c.display_value(row).to_lowercase().contains(&needle));
                    if !hit {
                        return false;
                    }
                }
                self.state.column_filters.iter().all(|(column_id, wanted)| {
                    self.columns
                        .iter()
                        .find(|c| &c.id == column_id)
                        .map_or(true, |c| {
                            c.display_value(row).eq_ignore_ascii_case(wanted)
                        })
                })
            })
            .collect();

        if let Some((column_id, direction)) = &self.state.sort {
            if let Some(column) = self.columns.iter().find(|c| &c.id == column_id) {
                // Stable sort; ties keep input order.
                indices.sort_by(|&a, &b| {
                    let ordering =
                        compare_cells(&column.display_value(&self.rows[a]), &column.display_value(&self.rows[b]));
                    match direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                });
            }
        }
        indices
    }

    /// Recompute the visible page.
    pub fn view(&self) -> TableView {
        let filtered = self.filtered_indices();
        let total_rows = filtered.len();
        let total_pages = self.total_pages();
        let page = self.state.page.min(total_pages);

        let start = (page - 1) * self.state.page_size;
        let rows = filtered
            .into_iter()
            .skip(start)
            .take(self.state.page_size)
            .map(|index| ViewRow {
                index,
                cells: self
                    .columns
                    .iter()
                    .map(|c| c.display_value(&self.rows[index]))
                    .collect(),
            })
            .collect();

        TableView {
            rows,
            total_rows,
            page,
            total_pages,
            page_window: page_window(page, total_pages),
        }
    }
}

/// Numeric-aware cell comparison: both sides parse as f64 compares
/// numerically, otherwise case-insensitive string order.
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(na), Ok(nb)) => na.partial_cmp(&nb).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

/// At most five page numbers centered on the current page, clamped to
/// the valid range.
fn page_window(page: usize, total_pages: usize) -> Vec<usize> {
    let mut start = page.saturating_sub(2).max(1);
    let end = (start + 4).min(total_pages);
    start = end.saturating_sub(4).max(1);
    (start..=end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;

    struct Order {
        id: u32,
        client: String,
        amount: f64,
    }

    fn orders(n: u32) -> Vec<Order> {
        (1..=n)
            .map(|i| Order {
                id: i,
                client: format!("عميل {}", i),
                amount: f64::from(i) * 10.0,
            })
            .collect()
    }

    fn engine_with(rows: Vec<Order>) -> TableEngine<Order> {
        let mut engine = TableEngine::new(vec![
            Column::number("id", "الرقم", |o: &Order| f64::from(o.id)),
            Column::text("client", "العميل", |o: &Order| o.client.clone()),
            Column::currency("amount", "المبلغ", |o: &Order| o.amount),
        ]);
        engine.set_rows(rows);
        engine
    }

    #[test]
    fn identity_pipeline_preserves_input_order() {
        let engine = engine_with(orders(4));
        assert_eq!(engine.filtered_indices(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn pagination_23_rows_in_pages_of_10() {
        let mut engine = engine_with(orders(23));
        assert_eq!(engine.total_pages(), 3);

        let view = engine.view();
        assert_eq!(view.rows.len(), 10);
        assert_eq!(view.total_rows, 23);

        engine.set_page(3);
        assert_eq!(engine.view().rows.len(), 3);

        engine.set_page(0);
        assert_eq!(engine.state().page, 3, "page 0 is a no-op");
        engine.set_page(4);
        assert_eq!(engine.state().page, 3, "past-the-end is a no-op");
    }

    #[test]
    fn search_spans_all_columns_and_resets_page() {
        let mut engine = engine_with(orders(23));
        engine.set_page(3);
        engine.set_search("عميل 1");

        assert_eq!(engine.state().page, 1);
        // "عميل 1", "عميل 10".."عميل 19"
        assert_eq!(engine.view().total_rows, 11);
    }

    #[test]
    fn numeric_sort_orders_by_value_not_lexicographically() {
        let mut engine = engine_with(vec![
            Order { id: 100, client: "a".into(), amount: 1.0 },
            Order { id: 9, client: "b".into(), amount: 1.0 },
            Order { id: 50, client: "c".into(), amount: 1.0 },
        ]);
        engine.set_sort("id");
        assert_eq!(engine.filtered_indices(), vec![1, 2, 0]);

        engine.set_sort("id");
        assert_eq!(engine.filtered_indices(), vec![0, 2, 1], "second click flips");
    }

    #[test]
    fn column_filter_is_exact_match() {
        let mut engine = engine_with(orders(5));
        engine.set_column_filter("client", Some("عميل 3"));
        let view = engine.view();
        assert_eq!(view.total_rows, 1);
        assert_eq!(view.rows[0].index, 2);

        engine.set_column_filter("client", None);
        assert_eq!(engine.view().total_rows, 5);
    }

    #[test]
    fn page_window_is_centered_and_clamped() {
        assert_eq!(page_window(1, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(6, 10), vec![4, 5, 6, 7, 8]);
        assert_eq!(page_window(10, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(1, 3), vec![1, 2, 3]);
        assert_eq!(page_window(1, 1), vec![1]);
    }

    #[test]
    fn empty_filtered_set_still_reports_one_page() {
        let mut engine = engine_with(orders(5));
        engine.set_search("لا يوجد");
        let view = engine.view();
        assert_eq!(view.total_rows, 0);
        assert_eq!(view.total_pages, 1);
        assert!(view.rows.is_empty());
    }
}
