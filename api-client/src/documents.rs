//! Document endpoints: entity document sets, metadata edits, uploads,
//! previews/downloads, and bulk operations.

use client_core::error::ApiError;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::{json, Value};
use validator::Validate;

use crate::client::ApiClient;
use crate::models::{
    Document, DocumentStats, DocumentUpdate, DownloadedFile, EntityDocumentsResponse,
    UploadMetadata,
};

/// Target of a bulk archive download: an explicit id set or everything
/// attached to one entity.
#[derive(Debug, Clone)]
pub enum BulkDownloadTarget {
    Documents(Vec<String>),
    Entity {
        entity_type: String,
        entity_id: String,
    },
}

impl ApiClient {
    pub async fn documents(&self) -> Result<Vec<Document>, ApiError> {
        let response: EntityDocumentsResponse =
            self.request(Method::GET, "/documents", None).await?;
        Ok(response.documents)
    }

    pub async fn document_stats(&self) -> Result<DocumentStats, ApiError> {
        self.request(Method::GET, "/documents/stats", None).await
    }

    /// Documents and derived statistics for one entity.
    pub async fn documents_for_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<EntityDocumentsResponse, ApiError> {
        self.request(
            Method::GET,
            &format!("/documents/entity/{}/{}", entity_type, entity_id),
            None,
        )
        .await
    }

    pub async fn search_documents(&self, query: &str) -> Result<Vec<Document>, ApiError> {
        let response: EntityDocumentsResponse = self
            .request(
                Method::GET,
                &format!("/documents/search?q={}", crate::resources::urlencode(query)),
                None,
            )
            .await?;
        Ok(response.documents)
    }

    pub async fn update_document(
        &self,
        document_id: &str,
        update: &DocumentUpdate,
    ) -> Result<Document, ApiError> {
        update
            .validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        self.request(
            Method::PUT,
            &format!("/documents/{}", document_id),
            Some(serde_json::to_value(update)?),
        )
        .await
    }

    pub async fn delete_document(&self, document_id: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, &format!("/documents/{}", document_id), None)
            .await
    }

    pub async fn bulk_delete_documents(&self, document_ids: &[String]) -> Result<Value, ApiError> {
        self.request(
            Method::POST,
            "/documents/bulk-delete",
            Some(json!({ "document_ids": document_ids })),
        )
        .await
    }

    /// Server-generated zip archive of the requested documents.
    pub async fn bulk_download_documents(
        &self,
        target: &BulkDownloadTarget,
    ) -> Result<DownloadedFile, ApiError> {
        let body = match target {
            BulkDownloadTarget::Documents(ids) => json!({ "document_ids": ids }),
            BulkDownloadTarget::Entity {
                entity_type,
                entity_id,
            } => json!({ "entity_type": entity_type, "entity_id": entity_id }),
        };
        self.request_bytes(Method::POST, "/documents/bulk-download", Some(body))
            .await
    }

    pub async fn preview_document(&self, document_id: &str) -> Result<DownloadedFile, ApiError> {
        self.request_bytes(
            Method::GET,
            &format!("/documents/preview/{}", document_id),
            None,
        )
        .await
    }

    pub async fn download_document(&self, document_id: &str) -> Result<DownloadedFile, ApiError> {
        self.request_bytes(
            Method::GET,
            &format!("/documents/download/{}", document_id),
            None,
        )
        .await
    }

    /// Multipart upload of one file with its metadata. The CSRF token
    /// is obtained (and refreshed on rejection) per request by the
    /// underlying envelope.
    pub async fn upload_document(
        &self,
        metadata: &UploadMetadata,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Value, ApiError> {
        metadata
            .validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let metadata = metadata.clone();
        let file_name = file_name.to_string();
        let mime_type = mime_type.to_string();

        self.post_multipart("/documents/upload", move || {
            let part = Part::bytes(bytes.clone())
                .file_name(file_name.clone())
                .mime_str(&mime_type)
                .unwrap_or_else(|_| Part::bytes(bytes.clone()).file_name(file_name.clone()));

            let mut form = Form::new()
                .part("file", part)
                .text("entity_type", metadata.entity_type.clone())
                .text("display_name", metadata.display_name.clone())
                .text("category", metadata.category.as_str())
                .text("status", metadata.status.as_str());

            if let Some(entity_id) = &metadata.entity_id {
                form = form.text("entity_id", entity_id.clone());
            }
            if let Some(expiry) = &metadata.expiry_date {
                form = form.text("expiry_date", expiry.clone());
            }
            if let Some(notes) = &metadata.notes {
                form = form.text("notes", notes.clone());
            }
            form
        })
        .await
    }
}
