use std::fmt::{Debug, Formatter};

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{HeaderMap, StatusCode};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::bot::event::WebhookEvent;
use crate::github::server::ServerStateRef;

/// GitHub caps webhook payloads at 25 MB.
const MAX_WEBHOOK_BODY_SIZE: usize = 25 * 1024 * 1024;

const SIGNATURE_HEADER: &str = "x-hub-signature-256";
const EVENT_HEADER: &str = "x-github-event";
const DELIVERY_HEADER: &str = "x-github-delivery";

/// axum extractor for verified GitHub webhook events.
#[derive(Debug)]
pub struct GitHubWebhook(pub WebhookEvent);

/// Extracts a webhook event from a HTTP request.
///
/// The signature is checked against the raw body before anything else is parsed.
#[async_trait]
impl FromRequest<ServerStateRef> for GitHubWebhook {
    type Rejection = StatusCode;

    async fn from_request(
        request: Request,
        state: &ServerStateRef,
    ) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        // Eagerly load body
        let body: Bytes = axum::body::to_bytes(body, MAX_WEBHOOK_BODY_SIZE)
            .await
            .map_err(|error| {
                tracing::error!("Parsing webhook body failed: {error:?}");
                StatusCode::BAD_REQUEST
            })?;

        // Verify that the request is valid
        let signature = parts
            .headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok());
        if !verify_signature(&body, signature, state.get_webhook_secret()) {
            tracing::error!("Webhook request failed, could not authenticate webhook");
            return Err(StatusCode::UNAUTHORIZED);
        }

        // Parse webhook content
        match parse_webhook_event(&parts.headers, body) {
            Ok(event) => Ok(GitHubWebhook(event)),
            Err(error) => {
                tracing::error!("Cannot parse webhook event: {error:?}");
                Err(StatusCode::BAD_REQUEST)
            }
        }
    }
}

fn parse_webhook_event(headers: &HeaderMap, body: Bytes) -> anyhow::Result<WebhookEvent> {
    let Some(event_type) = headers.get(EVENT_HEADER) else {
        return Err(anyhow::anyhow!("{EVENT_HEADER} header not found"));
    };
    let event_type = event_type.to_str()?;
    let delivery_id = headers
        .get(DELIVERY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    Ok(WebhookEvent::parse(event_type, delivery_id, body)?)
}

type HmacSha256 = Hmac<Sha256>;

/// Verifies that `body` is properly signed by GitHub with HMAC-SHA256 and the passed `secret`.
///
/// `signature_header` is the value of the `X-Hub-Signature-256` header (`sha256=<hex digest>`).
/// Returns `false` for a missing or malformed header. The digest is compared in constant time.
pub fn verify_signature(
    body: &[u8],
    signature_header: Option<&str>,
    secret: &WebhookSecret,
) -> bool {
    let Some(signature) = signature_header
        .and_then(|header| header.strip_prefix("sha256="))
        .and_then(|digest| hex::decode(digest).ok())
    else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.expose().as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

/// Wrapper for a secret which is zeroed on drop and can be exposed only through the [`WebhookSecret::expose`] method.
pub struct WebhookSecret(SecretString);

impl WebhookSecret {
    pub fn new(secret: String) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret().as_str()
    }
}

impl Debug for WebhookSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("WebhookSecret([REDACTED])")
    }
}
