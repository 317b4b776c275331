use std::fmt::{Display, Formatter};

use axum::body::Bytes;
use octocrab::models::InstallationId;
use serde::Deserialize;

use crate::github::{GithubRepoName, PullRequestNumber};

/// Identifies the kind of a webhook event: its type (`X-GitHub-Event`) and optionally its
/// `action`. Used as the key of the handler registration table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    event_type: String,
    action: Option<String>,
}

impl EventKey {
    pub fn new(event_type: &str, action: Option<&str>) -> Self {
        Self {
            event_type: event_type.to_string(),
            action: action.map(|action| action.to_string()),
        }
    }

    pub fn pull_request_opened() -> Self {
        Self::new("pull_request", Some("opened"))
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// Key matching every action of this event type.
    pub fn any_action(&self) -> Self {
        Self {
            event_type: self.event_type.clone(),
            action: None,
        }
    }
}

impl Display for EventKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.action {
            Some(action) => write!(f, "{}.{action}", self.event_type),
            None => f.write_str(&self.event_type),
        }
    }
}

/// A verified webhook delivery.
#[derive(Debug)]
pub struct WebhookEvent {
    key: EventKey,
    delivery_id: Option<String>,
    // Exact bytes that were received and verified; never re-serialized.
    raw_body: Bytes,
    payload: serde_json::Value,
}

#[derive(Deserialize)]
struct EventEnvelope {
    action: Option<String>,
    installation: Option<InstallationRef>,
}

#[derive(Deserialize)]
struct InstallationRef {
    id: u64,
}

impl WebhookEvent {
    /// Parses the body of a webhook delivery. Fails if the body is not JSON or if its `action`
    /// or `installation` fields have an unexpected shape.
    pub fn parse(
        event_type: &str,
        delivery_id: Option<String>,
        raw_body: Bytes,
    ) -> serde_json::Result<Self> {
        let payload: serde_json::Value = serde_json::from_slice(&raw_body)?;
        let envelope = EventEnvelope::deserialize(&payload)?;
        Ok(Self {
            key: EventKey::new(event_type, envelope.action.as_deref()),
            delivery_id,
            raw_body,
            payload,
        })
    }

    pub fn key(&self) -> &EventKey {
        &self.key
    }

    pub fn delivery_id(&self) -> Option<&str> {
        self.delivery_id.as_deref()
    }

    pub fn raw_body(&self) -> &[u8] {
        &self.raw_body
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    /// Installation of the GitHub App that the event was delivered for.
    pub fn installation_id(&self) -> Option<InstallationId> {
        EventEnvelope::deserialize(&self.payload)
            .ok()
            .and_then(|envelope| envelope.installation)
            .map(|installation| InstallationId(installation.id))
    }
}

#[derive(Deserialize)]
struct PullRequestEventPayload {
    pull_request: PullRequestData,
    repository: RepositoryData,
}

#[derive(Deserialize)]
struct PullRequestData {
    number: u64,
    title: String,
}

#[derive(Deserialize)]
struct RepositoryData {
    name: String,
    owner: OwnerData,
}

#[derive(Deserialize)]
struct OwnerData {
    login: String,
}

/// The parts of a `pull_request` payload needed to react to an opened pull request.
#[derive(Debug, Clone)]
pub struct PullRequestOpenedPayload {
    pub repository: GithubRepoName,
    pub number: PullRequestNumber,
    pub title: String,
}

#[derive(thiserror::Error, Debug)]
pub enum PayloadError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("pull request number must be positive")]
    ZeroPullRequestNumber,
}

impl PullRequestOpenedPayload {
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self, PayloadError> {
        let payload = PullRequestEventPayload::deserialize(payload)?;
        if payload.pull_request.number == 0 {
            return Err(PayloadError::ZeroPullRequestNumber);
        }
        Ok(Self {
            repository: GithubRepoName::new(
                &payload.repository.owner.login,
                &payload.repository.name,
            ),
            number: payload.pull_request.number.into(),
            title: payload.pull_request.title,
        })
    }
}
