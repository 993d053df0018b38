//! # Postgres Integration Tests
//!
//! Drive the router against a real database. Ignored by default; run with
//! `DATABASE_URL=postgres://... cargo test -p reqdoc-api --test postgres_tests -- --ignored`.

use std::collections::BTreeSet;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use reqdoc_api::config::AppConfig;
use reqdoc_api::db;
use reqdoc_api::state::AppState;
use reqdoc_api::store::Repository;

/// Helper: connect, migrate, and build the app. `None` when `DATABASE_URL`
/// is unset.
async fn postgres_app(uploads: &tempfile::TempDir) -> Option<Router> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    let pool = db::init_pool(&url).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    let config = AppConfig {
        uploads_dir: uploads.path().to_path_buf(),
        ..AppConfig::default()
    };
    Some(reqdoc_api::app(AppState::new(config, Repository::postgres(pool))))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn post_json(router: &Router, uri: &str, body: Value) -> Value {
    let (status, body) = send(
        router,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_create_version_is_serialized_by_row_lock() {
    let uploads = tempfile::tempdir().unwrap();
    let Some(router) = postgres_app(&uploads).await else {
        return;
    };

    let requirement = post_json(
        &router,
        "/requirements",
        json!({ "name": "Concurrent versions" }),
    )
    .await["requirement"]["id"]
        .as_i64()
        .unwrap();
    let document = post_json(
        &router,
        "/documents",
        json!({ "requirement_id": requirement, "name": "Policy" }),
    )
    .await["document"]["id"]
        .as_i64()
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let router = router.clone();
        handles.push(tokio::spawn(async move {
            let (status, body) = send(
                &router,
                Request::builder()
                    .method("POST")
                    .uri(format!("/documents/{document}/versions"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            body["version"]["version"].as_i64().unwrap()
        }));
    }

    let mut numbers = BTreeSet::new();
    for handle in handles {
        assert!(numbers.insert(handle.await.unwrap()), "duplicate number");
    }
    let expected: BTreeSet<i64> = (2..=17).collect();
    assert_eq!(numbers, expected);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_document_filter_and_status_round_trip_through_postgres() {
    let uploads = tempfile::tempdir().unwrap();
    let Some(router) = postgres_app(&uploads).await else {
        return;
    };

    let requirement = post_json(&router, "/requirements", json!({ "name": "Filtered" }))
        .await["requirement"]["id"]
        .as_i64()
        .unwrap();
    let created = post_json(
        &router,
        "/documents",
        json!({ "requirement_id": requirement, "name": "Evidence" }),
    )
    .await;
    let version = created["document"]["versions"][0]["id"].as_i64().unwrap();

    let (status, body) = send(
        &router,
        Request::builder()
            .method("PATCH")
            .uri(format!("/documents/versions/{version}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "status": "compliant" }).to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = send(
        &router,
        Request::builder()
            .uri(format!("/documents?requirement_id={requirement}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let documents = body["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["status"], "compliant");
}
