use std::sync::Arc;

use anyhow::Context;
use octocrab::models::{App, AppId, InstallationId};
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretVec};
use url::Url;

use client::GithubIssueClient;

use crate::bot::{InstallationClients, IssueClient};

pub mod client;
pub(crate) mod operations;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Creates a client authenticated as the GitHub App with the given ID.
pub fn create_github_client(
    app_id: AppId,
    github_url: &Url,
    private_key: &SecretVec<u8>,
) -> anyhow::Result<Octocrab> {
    let key = jsonwebtoken::EncodingKey::from_rsa_pem(private_key.expose_secret().as_ref())
        .context("Could not encode private key")?;

    Octocrab::builder()
        .base_uri(github_url.as_str())
        .context("Invalid GitHub API URL")?
        .app(app_id, key)
        .build()
        .context("Could not create octocrab builder")
}

/// Loads information about the GitHub App, which also checks that the app credentials work.
pub async fn load_github_app(client: &Octocrab) -> anyhow::Result<App> {
    let app = client
        .current()
        .app()
        .await
        .context("Could not load Github App")?;
    tracing::info!("Authenticated as '{}'", app.name);
    Ok(app)
}

/// Provides API clients for the installations of the GitHub App.
pub struct GithubAppClient {
    client: Octocrab,
}

impl GithubAppClient {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

impl InstallationClients for GithubAppClient {
    fn for_installation(&self, installation: InstallationId) -> Arc<dyn IssueClient> {
        Arc::new(GithubIssueClient::new(
            self.client.installation(installation),
        ))
    }
}
