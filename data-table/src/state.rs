//! View state of a table: search, per-column filters, sort, and page.
//! Owned by the engine; mutations go through engine methods so the
//! page-reset rules hold.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableState {
    pub search: String,
    pub column_filters: HashMap<String, String>,
    pub sort: Option<(String, SortDirection)>,
    pub page: usize,
    pub page_size: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            search: String::new(),
            column_filters: HashMap::new(),
            sort: None,
            page: 1,
            page_size: 10,
        }
    }
}
