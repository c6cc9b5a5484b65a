//! REST endpoints for the chat intake and session status.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use uuid::Uuid;

use crate::flow::{ConversationFlow, Program};
use crate::store::SessionStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub flow: Arc<ConversationFlow>,
    pub store: Arc<dyn SessionStore>,
}

/// POST /chat request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Omitted on the first message; the server mints one.
    pub session_id: Option<String>,
}

/// POST /chat response body.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

/// GET /api/sessions/{id} response body.
#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub session_id: String,
    pub program: Option<Program>,
    pub beneficiary_name: Option<String>,
    pub beneficiary_age: Option<u32>,
    pub assistance_request: Option<String>,
    pub intake_complete: bool,
}

/// Build the Axum router with chat and status routes.
pub fn chat_routes(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health))
        .route("/api/sessions/{id}", get(session_status))
        .layer(cors)
        .with_state(state)
}

/// CORS layer restricted to the configured frontend origins.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

// ── Handlers ────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "food-assist"
    }))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let session_id = request
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let turn = state.flow.process_message(&request.message, &session_id).await;

    Json(ChatResponse {
        response: turn.reply,
        session_id: turn.session_id,
    })
}

async fn session_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.load_session(&id).await {
        Ok(Some(session)) => {
            let status = SessionStatus {
                intake_complete: session.is_complete(),
                session_id: session.session_id,
                program: session.program,
                beneficiary_name: session.beneficiary_name,
                beneficiary_age: session.beneficiary_age,
                assistance_request: session.assistance_request,
            };
            Json(serde_json::to_value(status).unwrap_or_default()).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Unknown session"})),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}
