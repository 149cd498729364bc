//! Shared harness for API client integration tests: a wiremock server
//! standing in for the back-office backend, plus a client wired to it.

use api_client::ApiClient;
use client_core::config::Settings;
use client_core::notify::RecordingNotifier;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestBackend {
    pub server: MockServer,
    pub api: ApiClient,
    pub notifier: Arc<RecordingNotifier>,
}

pub async fn spawn() -> TestBackend {
    let server = MockServer::start().await;
    let notifier = Arc::new(RecordingNotifier::new(true));
    let api = ApiClient::new(&Settings::for_base_url(server.uri()), notifier.clone())
        .expect("failed to build api client");
    TestBackend {
        server,
        api,
        notifier,
    }
}

/// Mock serving a fixed CSRF token.
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
