//! Bulk operations over a selected document set, held by composition
//! wherever a view needs them.

use api_client::documents::BulkDownloadTarget;
use api_client::models::DownloadedFile;
use api_client::ApiClient;
use client_core::error::ApiError;
use client_core::messages::{message_for, MessageKind};
use std::sync::Arc;

pub struct BulkOperations {
    api: Arc<ApiClient>,
}

impl BulkOperations {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Delete a set of documents in one round-trip. Returns the number
    /// of ids submitted; the caller removes them from local state and
    /// invalidates caches.
    pub async fn delete(&self, ids: &[String]) -> Result<usize, ApiError> {
        if ids.is_empty() {
            return Err(ApiError::Validation(
                message_for(MessageKind::EmptySelection).to_string(),
            ));
        }
        self.api.bulk_delete_documents(ids).await?;
        tracing::info!(count = ids.len(), "bulk delete completed");
        Ok(ids.len())
    }

    /// Fetch a server-generated zip archive of the given documents.
    pub async fn download(&self, ids: &[String]) -> Result<DownloadedFile, ApiError> {
        if ids.is_empty() {
            return Err(ApiError::Validation(
                message_for(MessageKind::EmptySelection).to_string(),
            ));
        }
        let mut file = self
            .api
            .bulk_download_documents(&BulkDownloadTarget::Documents(ids.to_vec()))
            .await?;
        if file.filename.is_none() {
            file.filename = Some("documents.zip".to_string());
        }
        Ok(file)
    }
}
