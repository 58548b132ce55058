//! REST endpoints for the two scoring paths.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::agent::ToolCallMediator;
use crate::error::{Error, ToolError};
use crate::features::BorrowerRecord;
use crate::model::Decision;
use crate::pipeline::ScoringPipeline;

/// Application state shared across handlers. Everything inside is immutable
/// after startup, so cloning per request is just reference counting.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ScoringPipeline>,
    /// `None` when no oracle API key was configured; the form path still works.
    pub mediator: Option<Arc<ToolCallMediator>>,
}

/// Build the Axum router with scoring and chat routes.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/score", post(score))
        .route("/api/chat", post(chat))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "loan-screen"
    }))
}

// ── Direct scoring path ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ScoreResponse {
    label: u8,
    decision: Decision,
}

async fn score(
    State(state): State<AppState>,
    Json(record): Json<BorrowerRecord>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let label = state.pipeline.score_label(&record)?;
    Ok(Json(ScoreResponse {
        label,
        decision: Decision::from_label(label),
    }))
}

// ── Conversational path ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    reply: String,
    decision: Option<Decision>,
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Some(mediator) = state.mediator else {
        return Err(ApiError {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "conversational path disabled: no oracle API key configured".to_string(),
        });
    };
    let outcome = mediator.handle(&request.message).await?;
    Ok(Json(ChatResponse {
        reply: outcome.reply,
        decision: outcome.decision,
    }))
}

// ── Error mapping ───────────────────────────────────────────────────────

/// HTTP projection of service errors. Validation failures carry the specific
/// offending field so the caller can correct it.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let status = match &error {
            Error::Feature(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Tool(ToolError::MalformedArguments { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Tool(ToolError::UnknownToolCall { .. }) | Error::Llm(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = %self.status, "Request failed: {}", self.message);
        }
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}
