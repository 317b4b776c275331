use std::any::Any;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::Instrument;

use crate::bot::{DispatchResult, EventRouter, InstallationClients};
use crate::github::webhook::{GitHubWebhook, WebhookSecret};
use crate::utils::logging::LogError;

/// Shared server state for all axum handlers.
pub struct ServerState {
    router: EventRouter,
    clients: Arc<dyn InstallationClients>,
    webhook_secret: WebhookSecret,
}

impl ServerState {
    pub fn new(
        router: EventRouter,
        clients: Arc<dyn InstallationClients>,
        webhook_secret: WebhookSecret,
    ) -> Self {
        Self {
            router,
            clients,
            webhook_secret,
        }
    }

    pub fn get_webhook_secret(&self) -> &WebhookSecret {
        &self.webhook_secret
    }
}

pub type ServerStateRef = Arc<ServerState>;

/// Creates the HTTP application, with the webhook endpoint mounted at `webhook_path`.
pub fn create_app(state: ServerState, webhook_path: &str) -> Router {
    Router::new()
        .route(webhook_path, post(github_webhook_handler))
        .route("/health", get(health_handler))
        .layer(ConcurrencyLimitLayer::new(100))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(Arc::new(state))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Router panicked: {err:?}");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "")
}

/// Axum handler that receives a verified webhook and dispatches it to its event handler.
///
/// The response is sent only after the event handler finishes. Handler failures are logged and
/// the delivery is still acknowledged, since GitHub cannot do anything about them.
pub async fn github_webhook_handler(
    State(state): State<ServerStateRef>,
    GitHubWebhook(event): GitHubWebhook,
) -> impl IntoResponse {
    let span = tracing::info_span!(
        "Webhook",
        event = event.key().to_string(),
        delivery = event.delivery_id().unwrap_or("<unknown>")
    );

    match state
        .router
        .dispatch(&event, state.clients.as_ref())
        .instrument(span.clone())
        .await
    {
        DispatchResult::Handled(Ok(())) => {
            span.in_scope(|| tracing::debug!("Webhook event was handled"));
        }
        DispatchResult::Handled(Err(error)) => {
            span.log_error(error);
        }
        DispatchResult::Ignored => {}
    }
    (StatusCode::OK, "")
}
