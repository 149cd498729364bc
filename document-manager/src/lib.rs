//! Orchestration layer over the API client: per-entity collection
//! loading with cached document statistics, the document browser state
//! machine, bulk operations, and the upload batch pipeline.
pub mod browser;
pub mod bulk;
pub mod lists;
pub mod upload;

pub use browser::{BrowserState, DocumentBrowser, SortField, SortOrder};
pub use bulk::BulkOperations;
pub use lists::{
    DriverSource, EntityKind, EntityListManager, EntityRecord, EntitySource, EntityWithDocs,
    LoadOutcome, SharedStatsCache, VehicleSource,
};
pub use upload::{FileCandidate, FileResult, RejectReason, UploadBatch, UploadReport, UploadTarget};
