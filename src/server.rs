use std::sync::Arc;
use axum::{extract::State, routing::{get, post}, Router, Json};
use tower_http::cors::{CorsLayer, Any};
use serde_json::{json, Value};
use axum::http::StatusCode;
use tracing::{info, warn};
use crate::catalog::FilterCatalog;
use crate::compiler::{Compiler, SelectionRequest};

pub fn router(catalog: Arc<FilterCatalog>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);
    Router::new()
        .route("/v1/compile", post(compile))
        .route("/v1/catalog", get(catalog_listing))
        .layer(cors)
        .with_state(catalog)
}

async fn compile(
    State(catalog): State<Arc<FilterCatalog>>,
    Json(request): Json<SelectionRequest>,
) -> (StatusCode, Json<Value>) {
    let started = std::time::Instant::now();
    let compiler = Compiler::new(&catalog);
    match compiler.compile(&request) {
        Ok(compiled) => {
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            info!(ms = elapsed_ms, composed = compiled.composition.is_some(), "compile complete");
            (StatusCode::OK, Json(compiled.to_document()))
        }
        Err(e) => {
            let status = if e.is_request_error() { StatusCode::BAD_REQUEST } else { StatusCode::INTERNAL_SERVER_ERROR };
            let msg = format!("{e}");
            warn!(%msg, code = %status.as_u16(), "compile error");
            (status, Json(json!({ "error": msg })))
        }
    }
}

async fn catalog_listing(State(catalog): State<Arc<FilterCatalog>>) -> Json<FilterCatalog> {
    Json(catalog.as_ref().clone())
}
