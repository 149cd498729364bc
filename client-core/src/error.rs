use thiserror::Error;

use crate::messages::{message_for, MessageKind};

/// Error taxonomy for the back-office client.
///
/// `CsrfExpired` is an internal, recoverable condition: the API client
/// refreshes the token and retries once before surfacing anything to
/// the caller. Everything else propagates to a user-facing Arabic
/// message via [`ApiError::user_message`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("CSRF token rejected by backend")]
    CsrfExpired,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("partial batch failure: {succeeded} succeeded, {failed} failed")]
    PartialBatch {
        succeeded: usize,
        failed: usize,
        errors: Vec<String>,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// Build an HTTP error from a status code and an optional backend
    /// `{error}` message. Falls back to `HTTP <status>` when the body
    /// carried no message, matching the backend envelope contract.
    pub fn http(status: u16, message: Option<String>) -> Self {
        ApiError::Http {
            status,
            message: message.unwrap_or_else(|| format!("HTTP {}", status)),
        }
    }

    /// Localized (Arabic) message suitable for direct display.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Network(_) => message_for(MessageKind::NetworkFailure),
            ApiError::Http { status, .. } if *status >= 500 => {
                message_for(MessageKind::ServerError)
            }
            ApiError::Http { .. } => message_for(MessageKind::RequestFailed),
            ApiError::CsrfExpired => message_for(MessageKind::SessionExpired),
            ApiError::Validation(_) => message_for(MessageKind::ValidationFailed),
            ApiError::PartialBatch { .. } => message_for(MessageKind::PartialFailure),
            ApiError::Config(_) | ApiError::Serialization(_) => {
                message_for(MessageKind::Unexpected)
            }
        }
    }

    /// Whether this error is worth retrying at the resilience layer.
    /// Client-side validation and 4xx rejections are permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_falls_back_to_status_line() {
        let err = ApiError::http(503, None);
        assert!(matches!(
            &err,
            ApiError::Http { status: 503, message } if message == "HTTP 503"
        ));
    }

    #[test]
    fn http_error_prefers_backend_message() {
        let err = ApiError::http(400, Some("missing field".to_string()));
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn transient_classification() {
        assert!(ApiError::http(500, None).is_transient());
        assert!(!ApiError::http(404, None).is_transient());
        assert!(!ApiError::Validation("bad".into()).is_transient());
    }
}
