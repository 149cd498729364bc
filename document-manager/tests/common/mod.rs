//! Shared harness for manager integration tests: a wiremock backend
//! with stock driver/document fixtures.

use api_client::ApiClient;
use client_core::config::Settings;
use client_core::notify::RecordingNotifier;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestBackend {
    pub server: MockServer,
    pub api: Arc<ApiClient>,
    pub notifier: Arc<RecordingNotifier>,
}

pub async fn spawn() -> TestBackend {
    let server = MockServer::start().await;
    let notifier = Arc::new(RecordingNotifier::new(true));
    let api = Arc::new(
        ApiClient::new(&Settings::for_base_url(server.uri()), notifier.clone())
            .expect("failed to build api client"),
    );
    TestBackend {
        server,
        api,
        notifier,
    }
}

pub fn driver_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "full_name": name,
        "phone": "+96550123456",
        "is_active": true
    })
}

pub fn document_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "display_name": name,
        "original_filename": format!("{}.pdf", id),
        "mime_type": "application/pdf",
        "size_bytes": 2048,
        "category": "license",
        "status": "active",
        "created_at": "2025-01-22T14:30:52",
        "entity_type": "drivers",
        "entity_id": "driver_1"
    })
}

/// Mock the per-entity documents endpoint with the given documents and
/// a stats block derived from their count.
pub fn entity_documents_mock(entity_type: &str, entity_id: &str, documents: Vec<Value>) -> Mock {
    let stats = json!({
        "total_documents": documents.len(),
        "expired_count": 0,
        "expiring_soon": 0
    });
    Mock::given(method("GET"))
        .and(path(format!(
            "/api/documents/entity/{}/{}",
            entity_type, entity_id
        )))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "documents": documents, "stats": stats })),
        )
}

pub fn csrf_token_mock(token: &str) -> Mock {
    Mock::given(method("GET"))
        .and(path("/api/csrf-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "csrf_token": token })))
}

/// Count requests the server received for a method/path pair.
pub async fn requests_for(server: &MockServer, http_method: &str, url_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.to_string() == http_method && r.url.path() == url_path)
        .count()
}
