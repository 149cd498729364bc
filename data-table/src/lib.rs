//! Generic data-table engine: typed column definitions, a filter/sort/
//! paginate pipeline over an in-memory row set, and CSV/Excel export
//! plus CSV import. No rendering; the host surface draws whatever
//! [`TableEngine::view`] returns.

pub mod column;
pub mod engine;
pub mod export;
pub mod import;
pub mod state;

pub use column::{Column, ColumnKind};
pub use engine::{TableEngine, TableView};
pub use export::{export_csv, export_excel, ExportFile};
pub use import::{parse_csv, ImportedRow};
pub use state::{SortDirection, TableState};
