use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Active,
    Archived,
    Deleted,
    Pending,
    Approved,
    Rejected,
}

impl Default for DocumentStatus {
    fn default() -> Self {
        DocumentStatus::Active
    }
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Active => "active",
            DocumentStatus::Archived => "archived",
            DocumentStatus::Deleted => "deleted",
            DocumentStatus::Pending => "pending",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
        }
    }
}

/// Backend category vocabulary; labels are Arabic on the rendering side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    IdCopy,
    License,
    Insurance,
    Contract,
    Maintenance,
    Invoice,
    Receipt,
    Certificate,
    Other,
}

impl Default for DocumentCategory {
    fn default() -> Self {
        DocumentCategory::Other
    }
}

impl DocumentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::IdCopy => "id_copy",
            DocumentCategory::License => "license",
            DocumentCategory::Insurance => "insurance",
            DocumentCategory::Contract => "contract",
            DocumentCategory::Maintenance => "maintenance",
            DocumentCategory::Invoice => "invoice",
            DocumentCategory::Receipt => "receipt",
            DocumentCategory::Certificate => "certificate",
            DocumentCategory::Other => "other",
        }
    }

    /// Arabic display label, as the backend's category table defines it.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentCategory::IdCopy => "نسخة الهوية",
            DocumentCategory::License => "رخصة القيادة",
            DocumentCategory::Insurance => "تأمين المركبة",
            DocumentCategory::Contract => "عقد العمل",
            DocumentCategory::Maintenance => "سجل الصيانة",
            DocumentCategory::Invoice => "فاتورة",
            DocumentCategory::Receipt => "إيصال",
            DocumentCategory::Certificate => "شهادة",
            DocumentCategory::Other => "أخرى",
        }
    }
}

/// A document record as mirrored from the backend. Read-mostly on the
/// client; mutations go through PUT/DELETE and the mirror is updated
/// only after server confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub display_name: String,
    pub original_filename: String,
    pub mime_type: String,
    pub size_bytes: i64,
    #[serde(default)]
    pub category: DocumentCategory,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    pub entity_type: String,
    #[serde(default)]
    pub entity_id: Option<String>,
}

/// Derived per-entity document statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentStats {
    #[serde(default)]
    pub total_documents: u32,
    #[serde(default)]
    pub expired_count: u32,
    #[serde(default)]
    pub expiring_soon: u32,
}

/// Response of `GET /api/documents/entity/<type>/<id>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub stats: DocumentStats,
}

/// Metadata accompanying a single file in a multipart upload.
#[derive(Debug, Clone, Validate)]
pub struct UploadMetadata {
    pub entity_type: String,
    pub entity_id: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub display_name: String,
    pub category: DocumentCategory,
    pub status: DocumentStatus,
    pub expiry_date: Option<String>,
    pub notes: Option<String>,
}

/// Editable fields of a document (PUT body).
#[derive(Debug, Clone, Serialize, Validate)]
pub struct DocumentUpdate {
    #[validate(length(min = 1, max = 255))]
    pub display_name: String,
    pub category: DocumentCategory,
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Raw bytes fetched from a preview/download/bulk-archive endpoint.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub filename: Option<String>,
}
