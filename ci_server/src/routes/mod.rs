//! Notifier HTTP routes: event ingest, descriptor, health.

pub mod events;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use ci_notify::descriptor::{self, NotificatorDescriptor};
use ci_notify::NotificationDispatcher;
use tower_http::trace::TraceLayer;

use crate::config::NotifyConfig;

/// Shared state for route handlers.
#[derive(Clone)]
pub struct NotifyRouterState {
    pub dispatcher: NotificationDispatcher,
    pub config: NotifyConfig,
}

/// Build the notifier's Axum router.
pub fn notify_router(state: NotifyRouterState) -> Router {
    Router::new()
        .route("/events", post(events_handler))
        .route("/notificator", get(notificator_handler))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn events_handler(
    State(state): State<NotifyRouterState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<events::DispatchSummary>, StatusCode> {
    events::handle_event(&state.config, &state.dispatcher, &headers, body)
        .await
        .map(Json)
}

async fn notificator_handler() -> Json<NotificatorDescriptor> {
    Json(descriptor::descriptor())
}

async fn health() -> &'static str {
    "ok"
}
