//! HTTP ingress for ActiveCollab webhooks and chat commands.

use std::net::SocketAddr;
use std::sync::Arc;

use acord_contract::CommandEvent;
use acord_discord::{ChannelResolver, ChatPlatform};
use acord_pipeline::{deliver_processed_event, route_command, CommandActions, EventDispatcher};
use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const WEBHOOK_ENDPOINT: &str = "/webhook";
pub const COMMAND_ENDPOINT: &str = "/command";
pub const HEALTH_ENDPOINT: &str = "/healthz";
pub const WEBHOOK_SECRET_HEADER: &str = "x-angie-webhooksecret";

/// Shared collaborators for every request handler.
pub struct AcordServerState {
    pub dispatcher: EventDispatcher,
    pub channels: ChannelResolver,
    pub chat: Arc<dyn ChatPlatform>,
    pub actions: Arc<dyn CommandActions>,
    pub webhook_secret: Option<String>,
}

#[derive(Debug)]
struct AcordApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl AcordApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "missing or invalid webhook secret",
        )
    }
}

impl IntoResponse for AcordApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": {
                    "code": self.code,
                    "message": self.message,
                }
            })),
        )
            .into_response()
    }
}

pub fn build_acord_router(state: Arc<AcordServerState>) -> Router {
    Router::new()
        .route(WEBHOOK_ENDPOINT, post(handle_webhook))
        .route(COMMAND_ENDPOINT, post(handle_command))
        .route(HEALTH_ENDPOINT, get(handle_health))
        .with_state(state)
}

/// Serves until ctrl-c.
pub async fn run_acord_server(bind: &str, state: Arc<AcordServerState>) -> Result<()> {
    let bind_addr = bind
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid --bind '{bind}'"))?;
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind acord server on {bind_addr}"))?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve bound acord server address")?;
    tracing::info!(addr = %local_addr, "acord server listening");

    axum::serve(listener, build_acord_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("acord server exited unexpectedly")?;
    tracing::info!("acord server stopped");
    Ok(())
}

async fn handle_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn handle_webhook(
    State(state): State<Arc<AcordServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(error) = authorize_webhook(&state, &headers) {
        return error.into_response();
    }
    let raw = match serde_json::from_slice::<Value>(&body) {
        Ok(raw) => raw,
        Err(_) => {
            let message = format!(
                "Received invalid event: {}",
                String::from_utf8_lossy(&body)
            );
            tracing::warn!(reason_code = "invalid_event", "{message}");
            return AcordApiError::bad_request("invalid_event", message).into_response();
        }
    };

    let processed = match state.dispatcher.process_json_event(raw).await {
        Ok(processed) => processed,
        Err(error) => {
            // Unsupported event kinds arrive routinely; failed lookups do not.
            if error.is_rejection() {
                tracing::info!(reason_code = error.reason_code(), "{error}");
            } else {
                tracing::error!(reason_code = error.reason_code(), "{error}");
            }
            return AcordApiError::bad_request(error.reason_code(), error.to_string())
                .into_response();
        }
    };

    match deliver_processed_event(&state.channels, state.chat.as_ref(), &processed).await {
        Ok(report) => {
            tracing::info!(
                project_id = report.project_id,
                delivered = report.delivered.len(),
                failed = report.failed.len(),
                missing = report.missing.len(),
                "notification delivered"
            );
            (
                StatusCode::OK,
                Json(json!({ "status": "delivered", "delivery": report })),
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!(project_id = processed.project_id, "{error}");
            AcordApiError::new(StatusCode::BAD_GATEWAY, "delivery_failed", error.to_string())
                .into_response()
        }
    }
}

async fn handle_command(State(state): State<Arc<AcordServerState>>, body: Bytes) -> Response {
    let event = match serde_json::from_slice::<CommandEvent>(&body) {
        Ok(event) => event,
        Err(error) => {
            return AcordApiError::bad_request(
                "malformed_command",
                format!("failed to parse command body: {error}"),
            )
            .into_response();
        }
    };
    let code = route_command(state.actions.as_ref(), &event).await;
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "status": code }))).into_response()
}

fn authorize_webhook(state: &AcordServerState, headers: &HeaderMap) -> Result<(), AcordApiError> {
    let Some(expected) = state.webhook_secret.as_deref() else {
        return Ok(());
    };
    let provided = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim);
    if provided == Some(expected) {
        Ok(())
    } else {
        Err(AcordApiError::unauthorized())
    }
}
