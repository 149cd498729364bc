//! CSRF token rotation mid-session: a stale token is refreshed and the
//! mutation retried exactly once; persistent rejection does not loop.

mod common;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};
use workflow_tests::driver_fixture;

#[tokio::test]
async fn rotated_token_is_refreshed_and_the_mutation_retried_once() {
    let backend = common::spawn().await;

    // The token endpoint serves the stale token once, then the fresh one.
    Mock::given(method("GET"))
        .and(path("/api/csrf-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "csrf_token": "tok_stale" })),
        )
        .up_to_n_times(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/csrf-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "csrf_token": "tok_fresh" })),
        )
        .mount(&backend.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/drivers"))
        .and(header("X-CSRFToken", "tok_stale"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "CSRF token invalid" })),
        )
        .mount(&backend.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/drivers"))
        .and(header("X-CSRFToken", "tok_fresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(driver_fixture("driver_9", "سائق جديد")),
        )
        .mount(&backend.server)
        .await;

    let created = backend
        .api
        .create_driver(json!({ "full_name": "سائق جديد", "phone": "+96550999999" }))
        .await
        .unwrap();

    assert_eq!(created["id"], "driver_9");
    assert_eq!(
        common::requests_for(&backend.server, "POST", "/api/drivers").await,
        2,
        "stale attempt plus exactly one retry"
    );
    assert!(
        common::requests_for(&backend.server, "GET", "/api/csrf-token").await >= 2,
        "initial fetch plus refresh"
    );
}

#[tokio::test]
async fn persistent_csrf_rejection_surfaces_after_one_retry() {
    let backend = common::spawn().await;
    common::mount_csrf_token(&backend.server, "tok_doomed").await;
    Mock::given(method("POST"))
        .and(path("/api/drivers"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "CSRF token invalid" })),
        )
        .mount(&backend.server)
        .await;

    let result = backend.api.create_driver(json!({ "full_name": "x" })).await;

    assert!(result.is_err());
    assert_eq!(
        common::requests_for(&backend.server, "POST", "/api/drivers").await,
        2,
        "never more than one retry for the same request"
    );
}
