use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use axum::async_trait;
use thiserror::Error;

use crate::bot::event::{EventKey, WebhookEvent};
use crate::bot::{HandlerError, InstallationClients, IssueClient};

/// Reacts to a single kind of webhook event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(
        &self,
        client: &dyn IssueClient,
        payload: &serde_json::Value,
    ) -> Result<(), HandlerError>;
}

/// Outcome of routing a webhook event.
#[derive(Debug)]
pub enum DispatchResult {
    /// A registered handler was invoked, with the given outcome.
    Handled(Result<(), HandlerError>),
    /// No handler is registered for the event.
    Ignored,
}

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("A handler for `{0}` is already registered")]
    Duplicate(EventKey),
}

/// Registration table mapping event kinds to their handlers.
///
/// A key without an action matches every action of its event type, but a handler registered for
/// the exact `(event type, action)` pair takes precedence.
#[derive(Default)]
pub struct EventRouter {
    handlers: HashMap<EventKey, Arc<dyn EventHandler>>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler. At most one handler can be registered for a given key.
    pub fn register<H: EventHandler + 'static>(
        &mut self,
        key: EventKey,
        handler: H,
    ) -> Result<(), RegistrationError> {
        match self.handlers.entry(key) {
            Entry::Occupied(entry) => Err(RegistrationError::Duplicate(entry.key().clone())),
            Entry::Vacant(entry) => {
                tracing::debug!("Registered handler for {}", entry.key());
                entry.insert(Arc::new(handler));
                Ok(())
            }
        }
    }

    pub fn handler_for(&self, key: &EventKey) -> Option<&Arc<dyn EventHandler>> {
        self.handlers
            .get(key)
            .or_else(|| self.handlers.get(&key.any_action()))
    }

    /// Routes the event to its handler and waits until the handler finishes.
    pub async fn dispatch(
        &self,
        event: &WebhookEvent,
        clients: &dyn InstallationClients,
    ) -> DispatchResult {
        let Some(handler) = self.handler_for(event.key()) else {
            tracing::debug!("Ignoring event {} without a registered handler", event.key());
            return DispatchResult::Ignored;
        };
        let Some(installation) = event.installation_id() else {
            return DispatchResult::Handled(Err(HandlerError::MalformedPayload(
                "missing field `installation.id`".to_string(),
            )));
        };

        let client = clients.for_installation(installation);
        DispatchResult::Handled(handler.handle(client.as_ref(), event.payload()).await)
    }
}
