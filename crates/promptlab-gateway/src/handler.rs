use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use promptlab_core::ChatEnvelope;
use promptlab_providers::ChatDispatch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

pub const CHAT_PATH: &str = "/api/chat";

#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<dyn ChatDispatch>,
    relay_status: bool,
}

impl AppState {
    pub fn new(dispatcher: Arc<dyn ChatDispatch>) -> Self {
        Self {
            dispatcher,
            relay_status: false,
        }
    }

    /// Answer with the upstream status instead of a flat 200.
    pub fn with_relay_status(mut self, relay_status: bool) -> Self {
        self.relay_status = relay_status;
        self
    }
}

pub fn router(state: AppState, cors: bool) -> Router {
    let router = Router::new()
        .route(CHAT_PATH, post(chat_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn chat_handler(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let value: serde_json::Value =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    let request = ChatEnvelope::from_value(value).map_err(|e| ApiError::InvalidBody(e.to_string()))?;

    tracing::info!(
        model_key = request.model_key(),
        message_count = request.messages.as_ref().map_or(0, Vec::len),
        "chat_request_received"
    );

    let upstream = state.dispatcher.dispatch(request).await?;

    let status = if state.relay_status {
        StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY)
    } else {
        StatusCode::OK
    };

    Ok((status, Json(upstream.body)).into_response())
}
