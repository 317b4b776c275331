use std::fmt::{Debug, Formatter};
use std::path::PathBuf;

use octocrab::models::AppId;
use secrecy::SecretVec;
use thiserror::Error;
use url::Url;

use crate::github::api::DEFAULT_GITHUB_API_URL;
use crate::github::WebhookSecret;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_WEBHOOK_PATH: &str = "/api/webhook";
pub const DEFAULT_MESSAGE_PATH: &str = "message.md";

/// Raw configuration values, as passed on the command line or through the environment.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub app_id: u64,
    pub private_key_path: PathBuf,
    pub webhook_secret: String,
    pub enterprise_hostname: Option<String>,
    pub port: u16,
    pub webhook_path: String,
    pub message_path: PathBuf,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read private key from {}: {source}", path.display())]
    PrivateKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot read pull request comment template from {}: {source}", path.display())]
    CommentTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Webhook secret must not be empty")]
    EmptyWebhookSecret,
    #[error("Invalid enterprise hostname `{hostname}`: {source}")]
    EnterpriseHostname {
        hostname: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Webhook path `{0}` must start with `/`")]
    WebhookPath(String),
}

/// Process-wide configuration of the bot, loaded once at startup.
pub struct AppConfig {
    pub app_id: AppId,
    pub private_key: SecretVec<u8>,
    pub webhook_secret: WebhookSecret,
    /// Set when the app is installed on GitHub Enterprise Server.
    pub enterprise_base_url: Option<Url>,
    pub port: u16,
    pub webhook_path: String,
    /// Used verbatim as the body of the comment posted on opened pull requests.
    pub pr_comment_template: String,
}

impl AppConfig {
    /// Validates the configuration and reads the private key and the comment template from disk.
    pub fn load(source: ConfigSource) -> Result<Self, ConfigError> {
        if source.webhook_secret.is_empty() {
            return Err(ConfigError::EmptyWebhookSecret);
        }
        if !source.webhook_path.starts_with('/') {
            return Err(ConfigError::WebhookPath(source.webhook_path));
        }

        let enterprise_base_url = match source.enterprise_hostname {
            Some(hostname) if !hostname.is_empty() => Some(
                Url::parse(&format!("https://{hostname}/api/v3"))
                    .map_err(|source| ConfigError::EnterpriseHostname { hostname, source })?,
            ),
            _ => None,
        };

        let private_key =
            std::fs::read(&source.private_key_path).map_err(|source_error| {
                ConfigError::PrivateKey {
                    path: source.private_key_path.clone(),
                    source: source_error,
                }
            })?;
        let pr_comment_template =
            std::fs::read_to_string(&source.message_path).map_err(|source_error| {
                ConfigError::CommentTemplate {
                    path: source.message_path.clone(),
                    source: source_error,
                }
            })?;

        Ok(Self {
            app_id: AppId(source.app_id),
            private_key: SecretVec::new(private_key),
            webhook_secret: WebhookSecret::new(source.webhook_secret),
            enterprise_base_url,
            port: source.port,
            webhook_path: source.webhook_path,
            pr_comment_template,
        })
    }

    /// Base URL of the REST API that all GitHub calls are sent to.
    pub fn api_url(&self) -> Url {
        match &self.enterprise_base_url {
            Some(url) => url.clone(),
            None => Url::parse(DEFAULT_GITHUB_API_URL).expect("Default GitHub API URL is valid"),
        }
    }
}

impl Debug for AppConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("app_id", &self.app_id)
            .field("enterprise_base_url", &self.enterprise_base_url)
            .field("port", &self.port)
            .field("webhook_path", &self.webhook_path)
            .finish_non_exhaustive()
    }
}
