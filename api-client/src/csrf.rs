//! CSRF token lifecycle.
//!
//! The backend requires an `X-CSRFToken` header on every state-changing
//! request. The token is fetched once from `/api/csrf-token`, held in
//! memory as the single source of truth, and refreshed when the backend
//! rejects it.

use client_core::error::ApiError;
use serde::Deserialize;
use tokio::sync::Mutex;

#[derive(Deserialize)]
struct CsrfTokenResponse {
    csrf_token: String,
}

pub struct CsrfTokenStore {
    token: Mutex<Option<String>>,
}

impl CsrfTokenStore {
    pub fn new() -> Self {
        Self {
            token: Mutex::new(None),
        }
    }

    /// Return the cached token, fetching a fresh one on first use.
    pub async fn get_or_fetch(
        &self,
        http: &reqwest::Client,
        base_url: &str,
    ) -> Result<String, ApiError> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            return Ok(token.clone());
        }
        let token = fetch_token(http, base_url).await?;
        *guard = Some(token.clone());
        Ok(token)
    }

    /// Drop the cached token and fetch a replacement. Used when the
    /// backend reports the current token as stale.
    pub async fn refresh(
        &self,
        http: &reqwest::Client,
        base_url: &str,
    ) -> Result<String, ApiError> {
        let mut guard = self.token.lock().await;
        let token = fetch_token(http, base_url).await?;
        *guard = Some(token.clone());
        tracing::debug!("CSRF token refreshed");
        Ok(token)
    }

    pub async fn invalidate(&self) {
        *self.token.lock().await = None;
    }
}

impl Default for CsrfTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

async fn fetch_token(http: &reqwest::Client, base_url: &str) -> Result<String, ApiError> {
    let url = format!("{}/api/csrf-token", base_url);
    let response = http.get(&url).send().await?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!(status = %status, "CSRF token fetch failed");
        return Err(ApiError::http(status.as_u16(), None));
    }

    let body: CsrfTokenResponse = response.json().await?;
    Ok(body.csrf_token)
}
