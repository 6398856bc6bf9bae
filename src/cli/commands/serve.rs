//! HTTP answer API.
//!
//! Exposes the same pipeline the CLI uses for integration with frontends.

use crate::answer::{transform_query_for_date, AnswerEngine, ResponseMode};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::GavelError;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    engine: AnswerEngine,
    settings: Settings,
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let engine = AnswerEngine::from_settings(&settings)?;
    let state = Arc::new(AppState { engine, settings });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/answer", post(answer))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Gavel API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Answer", "POST /answer");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AnswerRequest {
    /// The question to answer.
    query: String,
    /// Response mode tag; only "in_depth" is implemented.
    #[serde(default = "default_response_type")]
    response_type: String,
    /// Documents to retrieve per corpus.
    k: Option<usize>,
    /// Whether to steer the model toward date-sorted documents.
    #[serde(default)]
    dated: bool,
}

fn default_response_type() -> String {
    "in_depth".to_string()
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn answer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnswerRequest>,
) -> impl IntoResponse {
    let mode: ResponseMode = match req.response_type.parse() {
        Ok(mode) => mode,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    let k = req.k.unwrap_or(state.settings.answer.k_per_corpus);
    let query = if req.dated {
        transform_query_for_date(&req.query)
    } else {
        req.query.clone()
    };

    match state.engine.answer(&query, mode, k).await {
        Ok(outcome) => Json(outcome.card).into_response(),
        Err(e @ GavelError::UnsupportedMode { .. }) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}
