//! HTTP adapter - axum routes, handlers, and DTOs for the chat API.

mod dto;
mod handlers;
mod routes;

pub use dto::{ChatRequest, ChatResponse, ContextResponse, ErrorResponse, OfferingResponse};
pub use handlers::ChatHandlers;
pub use routes::api_routes;
