//! Upload batch pipeline: client-side validation against the backend's
//! limits, sequential multipart uploads with progress, and an aggregate
//! report that names every file's outcome.

use api_client::models::{DocumentCategory, DocumentStatus, UploadMetadata};
use api_client::ApiClient;
use client_core::config::UploadSettings;
use client_core::diagnostics::SharedDiagnostics;
use client_core::error::ApiError;
use client_core::messages::{message_for, MessageKind};
use client_core::notify::Notifier;
use std::sync::Arc;
use std::time::Instant;

/// A file picked for upload, before validation.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    TooLarge,
    UnsupportedType,
}

impl RejectReason {
    pub fn user_message(&self) -> &'static str {
        match self {
            RejectReason::TooLarge => message_for(MessageKind::FileTooLarge),
            RejectReason::UnsupportedType => message_for(MessageKind::UnsupportedFileType),
        }
    }
}

/// Destination and shared metadata for a batch. The per-file display
/// name is derived from the file name.
#[derive(Debug, Clone)]
pub struct UploadTarget {
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub category: DocumentCategory,
    pub expiry_date: Option<String>,
    pub notes: Option<String>,
}

/// Outcome of one file in the batch.
#[derive(Debug, Clone)]
pub struct FileResult {
    pub file_name: String,
    pub error: Option<String>,
}

/// Aggregate batch outcome. Always produced, even when every file
/// failed; only an empty valid set short-circuits before any upload.
#[derive(Debug, Clone)]
pub struct UploadReport {
    pub succeeded: usize,
    pub failed: usize,
    pub per_file: Vec<FileResult>,
}

impl UploadReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

pub struct UploadBatch {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    settings: UploadSettings,
    diagnostics: SharedDiagnostics,
    valid: Vec<FileCandidate>,
    rejected: Vec<(FileCandidate, RejectReason)>,
}

impl UploadBatch {
    pub fn new(
        api: Arc<ApiClient>,
        notifier: Arc<dyn Notifier>,
        settings: UploadSettings,
        diagnostics: SharedDiagnostics,
    ) -> Self {
        Self {
            api,
            notifier,
            settings,
            diagnostics,
            valid: Vec::new(),
            rejected: Vec::new(),
        }
    }

    /// Validate and stage candidates. Rejected files stay listed (with
    /// their reason) so the caller can render them; they are excluded
    /// from the upload itself.
    pub fn add_files(&mut self, candidates: Vec<FileCandidate>) {
        for candidate in candidates {
            match self.validate(&candidate) {
                Some(reason) => {
                    tracing::warn!(
                        file_name = %candidate.file_name,
                        mime_type = %candidate.mime_type,
                        size = candidate.bytes.len(),
                        ?reason,
                        "file rejected before upload"
                    );
                    self.rejected.push((candidate, reason));
                }
                None => self.valid.push(candidate),
            }
        }
    }

    fn validate(&self, candidate: &FileCandidate) -> Option<RejectReason> {
        if candidate.bytes.len() as u64 > self.settings.max_file_size_bytes {
            return Some(RejectReason::TooLarge);
        }
        if !self
            .settings
            .allowed_mime_types
            .iter()
            .any(|m| m == &candidate.mime_type)
        {
            return Some(RejectReason::UnsupportedType);
        }
        None
    }

    pub fn valid_files(&self) -> &[FileCandidate] {
        &self.valid
    }

    pub fn rejected_files(&self) -> &[(FileCandidate, RejectReason)] {
        &self.rejected
    }

    pub fn clear(&mut self) {
        self.valid.clear();
        self.rejected.clear();
    }

    /// Upload the staged valid files sequentially.
    ///
    /// `progress` receives the percentage of settled files after each
    /// upload completes, success or failure. Per-file failures are
    /// collected into the report instead of aborting the batch; the
    /// only error return is an empty valid set.
    pub async fn execute(
        &mut self,
        target: &UploadTarget,
        mut progress: impl FnMut(u8),
    ) -> Result<UploadReport, ApiError> {
        if self.valid.is_empty() {
            return Err(ApiError::Validation(
                message_for(MessageKind::EmptySelection).to_string(),
            ));
        }

        let total = self.valid.len();
        let mut per_file = Vec::with_capacity(total);
        let mut succeeded = 0;
        let mut failed = 0;

        for (index, candidate) in self.valid.iter().enumerate() {
            let metadata = UploadMetadata {
                entity_type: target.entity_type.clone(),
                entity_id: target.entity_id.clone(),
                display_name: display_name_for(&candidate.file_name),
                category: target.category,
                status: DocumentStatus::Active,
                expiry_date: target.expiry_date.clone(),
                notes: target.notes.clone(),
            };

            let started = Instant::now();
            let outcome = self
                .api
                .upload_document(
                    &metadata,
                    &candidate.file_name,
                    &candidate.mime_type,
                    candidate.bytes.clone(),
                )
                .await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            if let Ok(mut log) = self.diagnostics.lock() {
                log.record_sample("document_upload", elapsed_ms);
            }

            match outcome {
                Ok(_) => {
                    succeeded += 1;
                    per_file.push(FileResult {
                        file_name: candidate.file_name.clone(),
                        error: None,
                    });
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!(file_name = %candidate.file_name, error = %e, "upload failed");
                    if let Ok(mut log) = self.diagnostics.lock() {
                        log.record_error("document_upload", e.to_string());
                    }
                    per_file.push(FileResult {
                        file_name: candidate.file_name.clone(),
                        error: Some(e.user_message().to_string()),
                    });
                }
            }

            progress(((index + 1) * 100 / total) as u8);
        }

        if failed == 0 {
            self.notifier
                .show_success(message_for(MessageKind::UploadComplete));
        } else {
            self.notifier
                .show_error(message_for(MessageKind::PartialFailure));
        }

        self.valid.clear();
        Ok(UploadReport {
            succeeded,
            failed,
            per_file,
        })
    }
}

/// "license.pdf" -> "license"; a nameless file keeps its raw name.
fn display_name_for(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}
