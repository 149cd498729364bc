//! Entity list manager against a mock backend: stats enrichment,
//! partial failure tolerance, caching, and invalidation.

mod common;

use client_core::diagnostics::DiagnosticsLog;
use client_core::retry::RetryConfig;
use document_manager::{DriverSource, EntityListManager, LoadOutcome};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_drivers(server: &MockServer, count: usize) {
    let drivers: Vec<_> = (1..=count)
        .map(|i| common::driver_json(&format!("driver_{}", i), &format!("سائق {}", i)))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/drivers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(drivers))
        .mount(server)
        .await;
}

#[tokio::test]
async fn load_enriches_every_driver_with_stats() {
    let backend = common::spawn().await;
    mount_drivers(&backend.server, 3).await;
    for i in 1..=3 {
        common::entity_documents_mock(
            "drivers",
            &format!("driver_{}", i),
            vec![common::document_json(&format!("doc_{}", i), "رخصة")],
        )
        .mount(&backend.server)
        .await;
    }

    let manager = EntityListManager::new(
        DriverSource,
        backend.api,
        RetryConfig::no_retry(),
        DiagnosticsLog::shared(),
    );
    let outcome = manager.load().await.unwrap();

    let LoadOutcome::Fresh(entities) = outcome else {
        panic!("expected a fresh load");
    };
    assert_eq!(entities.len(), 3);
    assert!(entities.iter().all(|e| e.stats.total_documents == 1));
}

#[tokio::test]
async fn one_failing_stats_request_does_not_fail_the_load() {
    let backend = common::spawn().await;
    mount_drivers(&backend.server, 6).await;
    for i in 1..=6 {
        if i == 3 {
            Mock::given(method("GET"))
                .and(path("/api/documents/entity/drivers/driver_3"))
                .respond_with(
                    ResponseTemplate::new(500).set_body_json(json!({ "error": "db down" })),
                )
                .mount(&backend.server)
                .await;
        } else {
            common::entity_documents_mock(
                "drivers",
                &format!("driver_{}", i),
                vec![common::document_json(&format!("doc_{}", i), "وثيقة")],
            )
            .mount(&backend.server)
            .await;
        }
    }

    let diagnostics = DiagnosticsLog::shared();
    let manager = EntityListManager::new(
        DriverSource,
        backend.api,
        RetryConfig::no_retry(),
        diagnostics.clone(),
    );
    let LoadOutcome::Fresh(entities) = manager.load().await.unwrap() else {
        panic!("expected a fresh load");
    };

    assert_eq!(entities.len(), 6, "the failing member stays in the list");
    let failed = entities
        .iter()
        .find(|e| e.record.id == "driver_3")
        .unwrap();
    assert_eq!(failed.stats.total_documents, 0, "failed stats zero out");
    assert!(entities
        .iter()
        .filter(|e| e.record.id != "driver_3")
        .all(|e| e.stats.total_documents == 1));

    let log = diagnostics.lock().unwrap();
    assert!(
        log.errors()
            .any(|e| e.context == "docstats_drivers_driver_3"),
        "the swallowed stats failure is still recorded for support"
    );
}

#[tokio::test]
async fn second_load_is_served_from_cache() {
    let backend = common::spawn().await;
    mount_drivers(&backend.server, 2).await;
    for i in 1..=2 {
        common::entity_documents_mock("drivers", &format!("driver_{}", i), vec![])
            .mount(&backend.server)
            .await;
    }

    let manager = EntityListManager::new(
        DriverSource,
        backend.api,
        RetryConfig::no_retry(),
        DiagnosticsLog::shared(),
    );
    manager.load().await.unwrap();
    manager.load().await.unwrap();

    assert_eq!(
        common::requests_for(&backend.server, "GET", "/api/drivers").await,
        1
    );
}

#[tokio::test]
async fn invalidate_forces_a_network_reload() {
    let backend = common::spawn().await;
    mount_drivers(&backend.server, 1).await;
    common::entity_documents_mock("drivers", "driver_1", vec![])
        .mount(&backend.server)
        .await;

    let manager = EntityListManager::new(
        DriverSource,
        backend.api,
        RetryConfig::no_retry(),
        DiagnosticsLog::shared(),
    );
    manager.load().await.unwrap();
    manager.invalidate().await;
    manager.load().await.unwrap();

    assert_eq!(
        common::requests_for(&backend.server, "GET", "/api/drivers").await,
        2
    );
    assert_eq!(
        common::requests_for(&backend.server, "GET", "/api/documents/entity/drivers/driver_1")
            .await,
        2,
        "stats entries are invalidated together with the composite"
    );
}

#[tokio::test]
async fn filter_matches_name_and_phone() {
    let backend = common::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/drivers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "d1", "full_name": "أحمد محمد", "phone": "+96550111111", "is_active": true },
            { "id": "d2", "full_name": "خالد سالم", "phone": "+96550222222", "is_active": true }
        ])))
        .mount(&backend.server)
        .await;
    for id in ["d1", "d2"] {
        common::entity_documents_mock("drivers", id, vec![])
            .mount(&backend.server)
            .await;
    }

    let manager = EntityListManager::new(
        DriverSource,
        backend.api,
        RetryConfig::no_retry(),
        DiagnosticsLog::shared(),
    );
    manager.load().await.unwrap();

    let by_name = manager.filter("أحمد").await;
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].record.id, "d1");

    let by_phone = manager.filter("50222222").await;
    assert_eq!(by_phone.len(), 1);
    assert_eq!(by_phone[0].record.id, "d2");

    assert_eq!(manager.filter("  ").await.len(), 2, "blank query passes all");
}

#[tokio::test]
async fn base_fetch_failure_surfaces_after_retries() {
    let backend = common::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/drivers"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "db down" })))
        .mount(&backend.server)
        .await;

    let diagnostics = DiagnosticsLog::shared();
    let manager = EntityListManager::new(
        DriverSource,
        backend.api,
        RetryConfig::quick(),
        diagnostics.clone(),
    );
    let result = manager.load().await;

    assert!(result.is_err());
    assert_eq!(
        common::requests_for(&backend.server, "GET", "/api/drivers").await,
        3,
        "three total invocations including the first"
    );
    assert!(
        diagnostics
            .lock()
            .unwrap()
            .errors()
            .any(|e| e.context == "drivers_with_docs"),
        "the surfaced failure lands in the diagnostics log"
    );
}
