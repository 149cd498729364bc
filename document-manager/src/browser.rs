//! Document browser: the stateful controller behind the per-entity
//! document table (search/filter/sort/paginate/select, row actions,
//! bulk actions).
//!
//! State machine: `Idle -> Loading -> Ready | Error`; every filter or
//! page change in `Ready` recomputes the visible set deterministically.
//! The selection set is independent of pagination and is cleared only
//! by a successful bulk action, a reopen, or an explicit filter reset.

use api_client::models::{
    Document, DocumentCategory, DocumentStatus, DocumentUpdate, DownloadedFile,
};
use api_client::ApiClient;
use chrono::NaiveDateTime;
use client_core::diagnostics::SharedDiagnostics;
use client_core::error::ApiError;
use client_core::messages::{message_for, MessageKind};
use client_core::notify::Notifier;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use crate::bulk::BulkOperations;
use crate::lists::{stats_key, SharedStatsCache};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserState {
    Idle,
    Loading,
    Ready,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    DisplayName,
    OriginalFilename,
    SizeBytes,
    CreatedAt,
    Category,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
struct DocumentFilter {
    search: String,
    category: Option<DocumentCategory>,
    status: Option<DocumentStatus>,
    sort: Option<(SortField, SortOrder)>,
}

impl Default for DocumentFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            status: None,
            sort: None,
        }
    }
}

pub struct DocumentBrowser {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    bulk: BulkOperations,
    stats_cache: SharedStatsCache,
    diagnostics: SharedDiagnostics,

    state: BrowserState,
    entity: Option<(String, String)>,
    documents: Vec<Document>,
    filter: DocumentFilter,
    selection: HashSet<String>,
    page: usize,
    page_size: usize,
    // Set when a mutation means the parent view should reload stats.
    stats_dirty: bool,
}

impl DocumentBrowser {
    pub fn new(
        api: Arc<ApiClient>,
        notifier: Arc<dyn Notifier>,
        stats_cache: SharedStatsCache,
        diagnostics: SharedDiagnostics,
    ) -> Self {
        Self {
            bulk: BulkOperations::new(Arc::clone(&api)),
            api,
            notifier,
            stats_cache,
            diagnostics,
            state: BrowserState::Idle,
            entity: None,
            documents: Vec::new(),
            filter: DocumentFilter::default(),
            selection: HashSet::new(),
            page: 1,
            page_size: 10,
            stats_dirty: false,
        }
    }

    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    /// Open the browser for one entity: filters and selection reset,
    /// then the document set is fetched.
    pub async fn open(&mut self, entity_type: &str, entity_id: &str) {
        self.filter = DocumentFilter::default();
        self.selection.clear();
        self.page = 1;
        self.entity = Some((entity_type.to_string(), entity_id.to_string()));
        self.fetch().await;
    }

    /// Retry affordance for the error state.
    pub async fn reload(&mut self) {
        self.fetch().await;
    }

    async fn fetch(&mut self) {
        let Some((entity_type, entity_id)) = self.entity.clone() else {
            return;
        };
        self.state = BrowserState::Loading;
        match self.api.documents_for_entity(&entity_type, &entity_id).await {
            Ok(response) => {
                self.documents = response.documents;
                self.state = BrowserState::Ready;
            }
            Err(e) => {
                tracing::error!(%entity_type, %entity_id, error = %e, "document fetch failed");
                self.record_error("document fetch", &e);
                self.notifier.show_error(e.user_message());
                self.state = BrowserState::Error(e.user_message().to_string());
            }
        }
    }

    // --- filter / sort / paginate ---

    pub fn set_search(&mut self, search: &str) {
        self.filter.search = search.to_string();
        self.page = 1;
    }

    pub fn set_category_filter(&mut self, category: Option<DocumentCategory>) {
        self.filter.category = category;
        self.page = 1;
    }

    pub fn set_status_filter(&mut self, status: Option<DocumentStatus>) {
        self.filter.status = status;
        self.page = 1;
    }

    /// Sort by a field; selecting the same field again flips the order.
    pub fn set_sort(&mut self, field: SortField) {
        self.filter.sort = match self.filter.sort {
            Some((current, SortOrder::Asc)) if current == field => Some((field, SortOrder::Desc)),
            _ => Some((field, SortOrder::Asc)),
        };
        self.page = 1;
    }

    /// Clear search, filters, and sort. Also clears the selection.
    pub fn reset_filters(&mut self) {
        self.filter = DocumentFilter::default();
        self.selection.clear();
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size > 0 {
            self.page_size = page_size;
            self.page = 1;
        }
    }

    /// Out-of-range pages are a no-op; the current page is unchanged.
    pub fn set_page(&mut self, page: usize) {
        if page >= 1 && page <= self.total_pages() {
            self.page = page;
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        let filtered = self.filtered_documents().len();
        if filtered == 0 {
            1
        } else {
            (filtered + self.page_size - 1) / self.page_size
        }
    }

    /// The deterministic pipeline: search -> category -> status ->
    /// stable sort. Ties preserve input order (`sort_by` is stable).
    pub fn filtered_documents(&self) -> Vec<&Document> {
        let needle = self.filter.search.trim().to_lowercase();
        let mut docs: Vec<&Document> = self
            .documents
            .iter()
            .filter(|d| {
                if needle.is_empty() {
                    return true;
                }
                d.display_name.to_lowercase().contains(&needle)
                    || d.original_filename.to_lowercase().contains(&needle)
                    || d.notes
                        .as_deref()
                        .map_or(false, |n| n.to_lowercase().contains(&needle))
            })
            .filter(|d| self.filter.category.map_or(true, |c| d.category == c))
            .filter(|d| self.filter.status.map_or(true, |s| d.status == s))
            .collect();

        if let Some((field, order)) = self.filter.sort {
            docs.sort_by(|a, b| {
                let ordering = compare_documents(a, b, field);
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }
        docs
    }

    /// The slice of the filtered set visible on the current page.
    pub fn current_page_documents(&self) -> Vec<&Document> {
        let filtered = self.filtered_documents();
        let start = (self.page - 1) * self.page_size;
        filtered
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    // --- selection ---

    /// Toggle a document in the selection. Only documents present in
    /// the current filtered set are selectable.
    pub fn toggle_selection(&mut self, document_id: &str) {
        let in_filtered = self
            .filtered_documents()
            .iter()
            .any(|d| d.id == document_id);
        if !in_filtered {
            return;
        }
        if !self.selection.remove(document_id) {
            self.selection.insert(document_id.to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected ids, intersected with the current filtered set so the
    /// selection invariant (subset of filtered) holds even after
    /// filters changed underneath it.
    pub fn selected_ids(&self) -> Vec<String> {
        let filtered: HashSet<&str> = self
            .filtered_documents()
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        let mut ids: Vec<String> = self
            .selection
            .iter()
            .filter(|id| filtered.contains(id.as_str()))
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    /// Whether a mutation since the last call means the parent view
    /// should reload its statistics.
    pub fn take_stats_dirty(&mut self) -> bool {
        std::mem::take(&mut self.stats_dirty)
    }

    // --- row actions ---

    pub async fn preview(&self, document_id: &str) -> Result<DownloadedFile, ApiError> {
        self.api.preview_document(document_id).await
    }

    pub async fn download(&self, document_id: &str) -> Result<DownloadedFile, ApiError> {
        self.api.download_document(document_id).await
    }

    pub async fn update(
        &mut self,
        document_id: &str,
        update: &DocumentUpdate,
    ) -> Result<(), ApiError> {
        let updated = self.api.update_document(document_id, update).await?;
        if let Some(doc) = self.documents.iter_mut().find(|d| d.id == document_id) {
            *doc = updated;
        }
        self.invalidate_entity_stats().await;
        self.stats_dirty = true;
        Ok(())
    }

    /// Delete one document after user confirmation. Returns whether the
    /// deletion happened (false means the user declined).
    pub async fn delete(&mut self, document_id: &str) -> Result<bool, ApiError> {
        let confirmed = self
            .notifier
            .show_confirm(message_for(MessageKind::ConfirmDelete))
            .await;
        if !confirmed {
            return Ok(false);
        }

        if let Err(e) = self.api.delete_document(document_id).await {
            self.record_error("document delete", &e);
            return Err(e);
        }
        self.documents.retain(|d| d.id != document_id);
        self.selection.remove(document_id);
        self.clamp_page();
        self.invalidate_entity_stats().await;
        self.stats_dirty = true;
        self.notifier
            .show_success(message_for(MessageKind::DeleteComplete));
        Ok(true)
    }

    // --- bulk actions ---

    /// Delete the selected documents in one round-trip. On success the
    /// rows are removed locally and the selection is cleared.
    pub async fn bulk_delete_selected(&mut self) -> Result<usize, ApiError> {
        let ids = self.selected_ids();
        // Reject an empty selection before bothering the user with a
        // confirmation prompt.
        if ids.is_empty() {
            return Err(ApiError::Validation(
                message_for(MessageKind::EmptySelection).to_string(),
            ));
        }

        let confirmed = self
            .notifier
            .show_confirm(message_for(MessageKind::ConfirmBulkDelete))
            .await;
        if !confirmed {
            return Ok(0);
        }

        let count = match self.bulk.delete(&ids).await {
            Ok(count) => count,
            Err(e) => {
                self.record_error("bulk delete", &e);
                return Err(e);
            }
        };
        let doomed: HashSet<String> = ids.into_iter().collect();
        self.documents.retain(|d| !doomed.contains(&d.id));
        self.selection.clear();
        self.clamp_page();
        self.invalidate_entity_stats().await;
        self.stats_dirty = true;
        self.notifier
            .show_success(message_for(MessageKind::DeleteComplete));
        Ok(count)
    }

    pub async fn bulk_download_selected(&self) -> Result<DownloadedFile, ApiError> {
        self.bulk.download(&self.selected_ids()).await
    }

    fn record_error(&self, context: &str, e: &ApiError) {
        if let Ok(mut log) = self.diagnostics.lock() {
            log.record_error(context, e.to_string());
        }
    }

    fn clamp_page(&mut self) {
        let total = self.total_pages();
        if self.page > total {
            self.page = total;
        }
    }

    async fn invalidate_entity_stats(&self) {
        if let Some((entity_type, entity_id)) = &self.entity {
            self.stats_cache
                .lock()
                .await
                .remove(&stats_key(entity_type, entity_id));
        }
    }
}

fn compare_documents(a: &Document, b: &Document, field: SortField) -> Ordering {
    match field {
        SortField::SizeBytes => a.size_bytes.cmp(&b.size_bytes),
        SortField::CreatedAt => match (parse_timestamp(&a.created_at), parse_timestamp(&b.created_at)) {
            (Some(ta), Some(tb)) => ta.cmp(&tb),
            _ => a.created_at.cmp(&b.created_at),
        },
        SortField::DisplayName => cmp_ci(&a.display_name, &b.display_name),
        SortField::OriginalFilename => cmp_ci(&a.original_filename, &b.original_filename),
        SortField::Category => cmp_ci(a.category.as_str(), b.category.as_str()),
        SortField::Status => cmp_ci(a.status.as_str(), b.status.as_str()),
    }
}

fn cmp_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::cache::TtlCache;
    use client_core::config::Settings;
    use client_core::diagnostics::DiagnosticsLog;
    use client_core::notify::RecordingNotifier;
    use tokio::sync::Mutex;

    fn doc(id: &str, name: &str, size: i64, created: &str) -> Document {
        Document {
            id: id.to_string(),
            display_name: name.to_string(),
            original_filename: format!("{}.pdf", id),
            mime_type: "application/pdf".to_string(),
            size_bytes: size,
            category: DocumentCategory::Other,
            status: DocumentStatus::Active,
            expiry_date: None,
            notes: None,
            created_at: created.to_string(),
            uploaded_by: None,
            entity_type: "drivers".to_string(),
            entity_id: Some("driver_1".to_string()),
        }
    }

    fn browser_with(documents: Vec<Document>) -> DocumentBrowser {
        let notifier = Arc::new(RecordingNotifier::new(true));
        let api = Arc::new(
            ApiClient::new(&Settings::for_base_url("http://localhost:1"), notifier.clone())
                .unwrap(),
        );
        let mut browser = DocumentBrowser::new(
            api,
            notifier,
            Arc::new(Mutex::new(TtlCache::with_defaults())),
            DiagnosticsLog::shared(),
        );
        browser.documents = documents;
        browser.state = BrowserState::Ready;
        browser.entity = Some(("drivers".to_string(), "driver_1".to_string()));
        browser
    }

    #[test]
    fn identity_pipeline_preserves_order() {
        let browser = browser_with(vec![
            doc("b", "ب", 2, "2025-01-02T00:00:00"),
            doc("a", "أ", 1, "2025-01-01T00:00:00"),
            doc("c", "ج", 3, "2025-01-03T00:00:00"),
        ]);
        let ids: Vec<&str> = browser.filtered_documents().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn search_matches_name_filename_and_notes() {
        let mut with_notes = doc("n", "عقد", 1, "2025-01-01T00:00:00");
        with_notes.notes = Some("تجديد سنوي".to_string());
        let mut browser = browser_with(vec![
            doc("a", "License Copy", 1, "2025-01-01T00:00:00"),
            with_notes,
        ]);

        browser.set_search("license");
        assert_eq!(browser.filtered_documents().len(), 1);

        browser.set_search("تجديد");
        let filtered = browser.filtered_documents();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "n");
    }

    #[test]
    fn sort_by_size_is_numeric_and_toggles() {
        let mut browser = browser_with(vec![
            doc("a", "a", 100, "2025-01-01T00:00:00"),
            doc("b", "b", 9, "2025-01-01T00:00:00"),
            doc("c", "c", 50, "2025-01-01T00:00:00"),
        ]);

        browser.set_sort(SortField::SizeBytes);
        let ids: Vec<&str> = browser.filtered_documents().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);

        browser.set_sort(SortField::SizeBytes);
        let ids: Vec<&str> = browser.filtered_documents().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn pagination_clamps_and_ignores_out_of_range() {
        let docs: Vec<Document> = (0..23)
            .map(|i| doc(&format!("d{:02}", i), "doc", i, "2025-01-01T00:00:00"))
            .collect();
        let mut browser = browser_with(docs);
        browser.set_page_size(10);

        assert_eq!(browser.total_pages(), 3);
        browser.set_page(3);
        assert_eq!(browser.current_page_documents().len(), 3);

        browser.set_page(0);
        assert_eq!(browser.page(), 3, "page 0 is a no-op");
        browser.set_page(4);
        assert_eq!(browser.page(), 3, "past-the-end page is a no-op");
    }

    #[test]
    fn filter_change_resets_page() {
        let docs: Vec<Document> = (0..23)
            .map(|i| doc(&format!("d{:02}", i), "doc", i, "2025-01-01T00:00:00"))
            .collect();
        let mut browser = browser_with(docs);
        browser.set_page(3);
        browser.set_status_filter(Some(DocumentStatus::Active));
        assert_eq!(browser.page(), 1);
    }

    #[test]
    fn selection_survives_page_change_and_intersects_filter() {
        let docs: Vec<Document> = (0..15)
            .map(|i| doc(&format!("d{:02}", i), &format!("doc {:02}", i), i, "2025-01-01T00:00:00"))
            .collect();
        let mut browser = browser_with(docs);

        browser.toggle_selection("d01");
        browser.toggle_selection("d12");
        browser.set_page(2);
        assert_eq!(browser.selected_ids(), vec!["d01", "d12"]);

        // A search that excludes d12 shrinks the effective selection.
        browser.set_search("doc 1");
        assert!(browser.selected_ids().contains(&"d12".to_string()));
        browser.set_search("doc 0");
        assert_eq!(browser.selected_ids(), vec!["d01"]);
    }

    #[test]
    fn unfiltered_documents_cannot_be_selected() {
        let mut browser = browser_with(vec![
            doc("a", "شهادة", 1, "2025-01-01T00:00:00"),
            doc("b", "فاتورة", 2, "2025-01-01T00:00:00"),
        ]);
        browser.set_search("شهادة");
        browser.toggle_selection("b");
        assert!(browser.selected_ids().is_empty());
    }

    #[test]
    fn created_at_sorts_chronologically() {
        let mut browser = browser_with(vec![
            doc("new", "a", 1, "2025-03-01T09:00:00"),
            doc("old", "b", 1, "2024-01-01T09:00:00"),
            doc("mid", "c", 1, "2024-06-15T09:00:00"),
        ]);
        browser.set_sort(SortField::CreatedAt);
        let ids: Vec<&str> = browser.filtered_documents().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["old", "mid", "new"]);
    }
}
