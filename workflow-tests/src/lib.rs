//! Shared infrastructure for the workflow tests: one-time tracing
//! setup and JSON fixture builders for the backend entities.
//!
//! The tests stand up a `wiremock` server scripted as the back-office
//! REST API and drive the real client stack against it; nothing here
//! talks to a live backend.

use serde_json::{json, Value};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Initialize tracing once for the whole test binary. Controlled by
/// `RUST_LOG`; silent by default.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

pub fn driver_fixture(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "full_name": name,
        "phone": "+96550123456",
        "national_id": "295010112345",
        "employment_type": "commission",
        "is_active": true
    })
}

pub fn document_fixture(id: &str, name: &str, entity_id: &str) -> Value {
    json!({
        "id": id,
        "display_name": name,
        "original_filename": format!("{}.pdf", id),
        "mime_type": "application/pdf",
        "size_bytes": 4096,
        "category": "license",
        "status": "active",
        "created_at": "2025-02-10T08:15:00",
        "entity_type": "drivers",
        "entity_id": entity_id
    })
}

pub fn entity_documents_fixture(documents: Vec<Value>) -> Value {
    let total = documents.len();
    json!({
        "documents": documents,
        "stats": {
            "total_documents": total,
            "expired_count": 0,
            "expiring_soon": 0
        }
    })
}
