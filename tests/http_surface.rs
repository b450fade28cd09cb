use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use stock_selector::catalog::FilterCatalog;
use stock_selector::server::router;
use stock_selector::SelectorError;
use tower::ServiceExt;

fn setup() -> axum::Router {
    router(Arc::new(FilterCatalog::cn_stock().expect("built-in catalog is valid")))
}

async fn post_compile(body: &str) -> (StatusCode, Value) {
    let response = setup()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/compile")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("router answers");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn compile_returns_sql_document() {
    let (status, body) = post_compile(r#"{"selections":{"st_statuses":["正常"]}}"#).await;
    assert_eq!(status, StatusCode::OK);
    let sql = body["sql"].as_str().expect("sql field");
    assert!(sql.contains("cn_stock_status.st_status IN (0,)"));
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn unknown_dimension_is_a_bad_request() {
    let (status, body) = post_compile(r#"{"selections":{"sectors":["主板"]}}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().expect("error field");
    assert!(message.contains("Unknown filter dimension: sectors"));
}

#[tokio::test]
async fn broken_base_query_is_a_bad_request() {
    let (status, body) = post_compile(r#"{"base_query":{"sql":"SELECT 'x"}}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error field").starts_with("Materialization error"));
}

#[tokio::test]
async fn catalog_listing_round_trips() {
    let response = setup()
        .oneshot(
            Request::builder()
                .uri("/v1/catalog")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router answers");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let listed: FilterCatalog = serde_json::from_slice(&bytes).expect("catalog json");
    assert_eq!(listed, FilterCatalog::cn_stock().expect("built-in catalog is valid"));
}

#[test]
fn deployment_errors_are_not_request_errors() {
    assert!(SelectorError::UnknownDimension(String::from("sectors")).is_request_error());
    assert!(SelectorError::Materialization { message: String::from("x") }.is_request_error());
    assert!(!SelectorError::Catalog(String::from("duplicate label")).is_request_error());
    assert!(!SelectorError::Config(String::from("bad address")).is_request_error());
}
