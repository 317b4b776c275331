//! This is the library of the PR task bot.
//!
//! The bot is a GitHub App that listens for `pull_request.opened` webhooks, greets the
//! pull request with a comment and opens a tracking issue for it.
pub mod bot;
pub mod config;
pub mod github;
pub mod utils;

pub use bot::{create_event_router, EventRouter};
pub use config::{AppConfig, ConfigError, ConfigSource};
pub use github::api::{create_github_client, load_github_app, GithubAppClient};
pub use github::server::{create_app, ServerState};
pub use github::WebhookSecret;
