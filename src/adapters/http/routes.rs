//! HTTP routes for the chat API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::application::TurnOrchestrator;

use super::handlers::{chat, health, ChatHandlers};

/// Creates the API router with all endpoints.
pub fn api_routes(orchestrator: Arc<TurnOrchestrator>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/health", get(health))
        .with_state(ChatHandlers::new(orchestrator))
}
