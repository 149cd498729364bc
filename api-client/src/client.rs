use client_core::config::Settings;
use client_core::error::ApiError;
use client_core::notify::Notifier;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::csrf::CsrfTokenStore;
use crate::loading::LoadingTracker;
use crate::models::DownloadedFile;

const CSRF_HEADER: &str = "X-CSRFToken";

/// Single point of HTTP access to the back-office API.
///
/// Constructed once at application start and shared via `Arc`; there
/// are no module-level singletons.
pub struct ApiClient {
    http: Client,
    base_url: String,
    csrf: CsrfTokenStore,
    loading: Arc<LoadingTracker>,
}

impl ApiClient {
    pub fn new(settings: &Settings, notifier: Arc<dyn Notifier>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.backend.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.backend.base_url.trim_end_matches('/').to_string(),
            csrf: CsrfTokenStore::new(),
            loading: Arc::new(LoadingTracker::new(notifier)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of requests currently in flight (drives the loading
    /// indicator; exposed for tests).
    pub fn in_flight(&self) -> usize {
        self.loading.in_flight()
    }

    /// Core request envelope: `{base}/api{endpoint}`, JSON in/out.
    ///
    /// State-changing methods carry the CSRF token. A 400 whose `error`
    /// body contains "CSRF" triggers one token refresh and one retry;
    /// a second rejection surfaces as a plain HTTP error. The loading
    /// guard is held for the whole exchange, including error paths.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let _guard = self.loading.acquire();

        let url = format!("{}/api{}", self.base_url, endpoint);
        let needs_csrf = is_state_changing(&method);
        let mut token = if needs_csrf {
            Some(self.csrf.get_or_fetch(&self.http, &self.base_url).await?)
        } else {
            None
        };

        let mut retried = false;
        loop {
            let response = self
                .send_json(method.clone(), &url, body.as_ref(), token.as_deref())
                .await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response.json::<T>().await?);
            }

            let message = read_error_message(response).await;
            if needs_csrf && !retried && is_csrf_rejection(status, message.as_deref()) {
                tracing::warn!(endpoint, "CSRF token rejected, refreshing and retrying once");
                token = Some(self.csrf.refresh(&self.http, &self.base_url).await?);
                retried = true;
                continue;
            }

            tracing::error!(endpoint, status = status.as_u16(), "request failed");
            return Err(ApiError::http(status.as_u16(), message));
        }
    }

    /// Same envelope as [`request`](Self::request) but returns raw
    /// bytes, for preview/download/bulk-archive endpoints.
    pub async fn request_bytes(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<DownloadedFile, ApiError> {
        let _guard = self.loading.acquire();

        let url = format!("{}/api{}", self.base_url, endpoint);
        let needs_csrf = is_state_changing(&method);
        let mut token = if needs_csrf {
            Some(self.csrf.get_or_fetch(&self.http, &self.base_url).await?)
        } else {
            None
        };

        let mut retried = false;
        loop {
            let response = self
                .send_json(method.clone(), &url, body.as_ref(), token.as_deref())
                .await?;
            let status = response.status();

            if status.is_success() {
                let content_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let filename = filename_from_disposition(
                    response
                        .headers()
                        .get(reqwest::header::CONTENT_DISPOSITION)
                        .and_then(|v| v.to_str().ok()),
                );
                let bytes = response.bytes().await?.to_vec();
                return Ok(DownloadedFile {
                    bytes,
                    content_type,
                    filename,
                });
            }

            let message = read_error_message(response).await;
            if needs_csrf && !retried && is_csrf_rejection(status, message.as_deref()) {
                token = Some(self.csrf.refresh(&self.http, &self.base_url).await?);
                retried = true;
                continue;
            }

            return Err(ApiError::http(status.as_u16(), message));
        }
    }

    /// Multipart POST with the same CSRF-refresh-and-retry contract.
    /// The form is rebuilt by the closure because a multipart body is
    /// consumed on send.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        make_form: impl Fn() -> reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let _guard = self.loading.acquire();

        let url = format!("{}/api{}", self.base_url, endpoint);
        let mut token = self.csrf.get_or_fetch(&self.http, &self.base_url).await?;

        let mut retried = false;
        loop {
            let response = self
                .http
                .post(&url)
                .header(CSRF_HEADER, &token)
                .multipart(make_form())
                .send()
                .await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response.json::<T>().await?);
            }

            let message = read_error_message(response).await;
            if !retried && is_csrf_rejection(status, message.as_deref()) {
                tracing::warn!(endpoint, "CSRF token rejected on upload, retrying once");
                token = self.csrf.refresh(&self.http, &self.base_url).await?;
                retried = true;
                continue;
            }

            return Err(ApiError::http(status.as_u16(), message));
        }
    }

    async fn send_json(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        csrf_token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut req = self.http.request(method, url);
        if let Some(token) = csrf_token {
            req = req.header(CSRF_HEADER, token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        Ok(req.send().await?)
    }
}

fn is_state_changing(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

fn is_csrf_rejection(status: StatusCode, message: Option<&str>) -> bool {
    status == StatusCode::BAD_REQUEST && message.map_or(false, |m| m.contains("CSRF"))
}

async fn read_error_message(response: reqwest::Response) -> Option<String> {
    let text = response.text().await.ok()?;
    serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v.get("error")?.as_str().map(String::from))
}

fn filename_from_disposition(header: Option<&str>) -> Option<String> {
    let header = header?;
    header.split(';').find_map(|part| {
        let part = part.trim();
        part.strip_prefix("filename=")
            .map(|name| name.trim_matches('"').to_string())
    })
}
