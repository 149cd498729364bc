//! Scripted backend harness shared by the workflow tests.

use api_client::ApiClient;
use client_core::config::Settings;
use client_core::notify::RecordingNotifier;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct Backend {
    pub server: MockServer,
    pub api: Arc<ApiClient>,
    pub notifier: Arc<RecordingNotifier>,
}

pub async fn spawn() -> Backend {
    workflow_tests::init_test_tracing();
    let server = MockServer::start().await;
    let notifier = Arc::new(RecordingNotifier::new(true));
    let api = Arc::new(
        ApiClient::new(&Settings::for_base_url(server.uri()), notifier.clone())
            .expect("failed to build api client"),
    );
    Backend {
        server,
        api,
        notifier,
    }
}

pub async fn mount_csrf_token(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/api/csrf-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "csrf_token": token })))
        .mount(server)
        .await;
}

pub async fn requests_for(server: &MockServer, http_method: &str, url_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.to_string() == http_method && r.url.path() == url_path)
        .count()
}
