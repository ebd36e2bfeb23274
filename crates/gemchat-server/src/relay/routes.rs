// crates/gemchat-server/src/relay/routes.rs
// HTTP routes for the relay

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::{Method, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use gemchat_types::{RelayReply, RelayRequest};
use serde::Serialize;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::RelayError;
use crate::relay::{self, RelayState};

/// Large enough for a 20 MiB image once base64-encoded inside JSON
pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Create the axum router with all relay routes
pub fn create_router(state: RelayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let api_router = Router::new()
        .route("/chat", post(chat))
        .with_state(state.clone());

    let mut router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_router);

    if let Some(dir) = &state.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Relay a chat message to Gemini
async fn chat(
    State(state): State<RelayState>,
    payload: Result<Json<RelayRequest>, JsonRejection>,
) -> Result<Json<RelayReply>, RelayError> {
    let Json(request) = payload.map_err(|e| RelayError::InvalidBody(e.body_text()))?;

    let reply = relay::relay(state.gemini.as_deref(), request)
        .await
        .inspect_err(|e| error!(status = e.status_code().as_u16(), error = %e, "Chat relay failed"))?;

    Ok(Json(RelayReply { reply }))
}

/// Turn a handler panic into the relay's JSON 500
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    error!(panic = %detail, "Relay handler panicked");

    RelayError::Unexpected("Internal server error".to_string()).into_response()
}
