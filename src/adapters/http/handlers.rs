//! HTTP handlers for the chat endpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::application::TurnOrchestrator;
use crate::domain::foundation::SessionId;
use crate::ports::SessionStoreError;

use super::dto::{ChatRequest, ChatResponse, ErrorResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ChatHandlers {
    orchestrator: Arc<TurnOrchestrator>,
}

impl ChatHandlers {
    pub fn new(orchestrator: Arc<TurnOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/chat - Handle one chat turn
pub async fn chat(
    State(handlers): State<ChatHandlers>,
    Json(req): Json<ChatRequest>,
) -> Response {
    let session_id = match SessionId::new(req.session_id) {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid session ID")),
            )
                .into_response()
        }
    };

    if req.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Message must not be empty")),
        )
            .into_response();
    }

    match handlers.orchestrator.handle_turn(&session_id, &req.message).await {
        Ok(outcome) => {
            let response: ChatResponse = outcome.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_store_error(e),
    }
}

/// GET /health - Liveness probe
pub async fn health() -> Response {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_store_error(err: SessionStoreError) -> Response {
    error!(error = %err, "session store failure");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse::service_unavailable(
            "Session storage is unavailable",
        )),
    )
        .into_response()
}
