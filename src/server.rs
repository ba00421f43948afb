//! HTTP surface for the causal reasoning service
//!
//! Thin axum layer: decodes requests, invokes the evaluator, serializes the
//! payloads. Domain and query-variable failures come back as ordinary
//! `{"error": …}` bodies with status 200 so example clients can treat every
//! response uniformly; only malformed JSON is rejected at the transport.

use axum::{
    extract::{Json, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use anyhow::Result;
use std::env;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::evaluator::{self, EvaluationRequest, Sampler, ThreadSampler};
use crate::scenario;

#[derive(Clone)]
pub struct AppState {
    pub sampler: Arc<dyn Sampler>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            sampler: Arc::new(ThreadSampler),
        }
    }
}

/// Build the service router. Separate from `run_server` so tests can drive
/// the routes in-process without binding a socket.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/v1/domains", get(domains_handler))
        .route("/api/v1/schema/{domain}", get(schema_handler))
        .route("/api/v1/evaluate_causal_reasoning", post(evaluate_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server() -> Result<()> {
    info!("🧠 Starting Causal Reasoning Server...");

    let state = AppState::default();

    let port = env::var("CAUSAL_PORT").unwrap_or_else(|_| "8000".to_string());
    let addr = format!("0.0.0.0:{}", port);
    info!("🚀 Causal Server listening at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

async fn domains_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "domains": scenario::list_domains() }))
}

async fn schema_handler(Path(domain): Path<String>) -> Json<serde_json::Value> {
    match scenario::lookup(&domain) {
        Some(scenario) => Json(serde_json::json!({
            "schema": scenario::render_schema(&domain, scenario),
            "domain": domain,
            "variables": scenario,
        })),
        None => Json(serde_json::json!({
            "error": format!("Domain {} not found", domain),
        })),
    }
}

async fn evaluate_handler(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Response {
    debug!(
        "evaluate: domain={} query={} model={}",
        request.domain, request.query_variable, request.model
    );

    match evaluator::evaluate(&request, state.sampler.as_ref()) {
        Ok(evaluation) => Json(evaluation).into_response(),
        Err(err) => Json(serde_json::json!({ "error": err.to_string() })).into_response(),
    }
}
