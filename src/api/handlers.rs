//! HTTP request handlers

use super::types::{ChatRequest, ChatResponse, ErrorResponse, HealthResponse, SessionResponse};
use super::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::any::Any;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // One dialogue turn
        .route("/api/chat", post(chat))
        // Session inspection
        .route("/api/sessions/:id", get(get_session))
        // Liveness
        .route("/health", get(health))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Chat
// ============================================================

/// The body is taken raw so a malformed request degrades to an empty one
/// instead of a 4xx
async fn chat(State(state): State<AppState>, body: Bytes) -> Json<ChatResponse> {
    let request = ChatRequest::from_body(&body);
    let session_id = request.session_id.clone();

    match state
        .runtime
        .handle_turn(session_id.as_deref(), request.into_event())
        .await
    {
        Ok(outcome) => Json(ChatResponse {
            reply: outcome.reply.text,
            session_id: Some(outcome.session_id),
            ui: outcome.reply.ui,
        }),
        Err(e) => {
            tracing::error!(
                session_id = session_id.as_deref().unwrap_or("-"),
                error = %e,
                "Chat turn failed"
            );
            Json(ChatResponse::apology())
        }
    }
}

// ============================================================
// Session inspection
// ============================================================

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .runtime
        .session(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;

    Ok(Json(SessionResponse {
        session_id: id,
        stage: session.stage,
        draft: session.draft,
        created_at: session.created_at,
    }))
}

// ============================================================
// Health / version
// ============================================================

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        live_sessions: state.runtime.live_sessions().await,
    })
}

async fn get_version() -> &'static str {
    concat!("giftflow ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Panics
// ============================================================

/// Turn a handler panic into the chat apology, for `CatchPanicLayer`
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ChatResponse::apology()),
    )
        .into_response()
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
