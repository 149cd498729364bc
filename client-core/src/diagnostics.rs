//! Bounded diagnostic log: last 10 error records and last 100
//! upload/download timing samples, persisted as JSON next to the app's
//! config. Diagnostic only; persistence failures are logged and
//! swallowed, never surfaced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

const MAX_ERROR_RECORDS: usize = 10;
const MAX_PERF_SAMPLES: usize = 100;

/// One log shared by every manager that surfaces errors or times
/// uploads; handed out at construction alongside the notifier.
pub type SharedDiagnostics = Arc<Mutex<DiagnosticsLog>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub timestamp: DateTime<Utc>,
    pub context: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerfSample {
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub duration_ms: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DiagnosticsLog {
    errors: VecDeque<ErrorRecord>,
    samples: VecDeque<PerfSample>,
}

impl DiagnosticsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedDiagnostics {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn record_error(&mut self, context: impl Into<String>, message: impl Into<String>) {
        if self.errors.len() >= MAX_ERROR_RECORDS {
            self.errors.pop_front();
        }
        self.errors.push_back(ErrorRecord {
            timestamp: Utc::now(),
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn record_sample(&mut self, operation: impl Into<String>, duration_ms: u64) {
        if self.samples.len() >= MAX_PERF_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back(PerfSample {
            timestamp: Utc::now(),
            operation: operation.into(),
            duration_ms,
        });
    }

    pub fn errors(&self) -> impl Iterator<Item = &ErrorRecord> {
        self.errors.iter()
    }

    pub fn samples(&self) -> impl Iterator<Item = &PerfSample> {
        self.samples.iter()
    }

    pub fn save(&self, path: &Path) {
        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize diagnostics log");
                return;
            }
        };
        if let Err(e) = std::fs::write(path, json) {
            tracing::warn!(path = %path.display(), error = %e, "failed to persist diagnostics log");
        }
    }

    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "diagnostics log corrupt, starting fresh");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}
