use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use pr_task_bot::config::{DEFAULT_MESSAGE_PATH, DEFAULT_PORT, DEFAULT_WEBHOOK_PATH};
use pr_task_bot::{
    create_app, create_event_router, create_github_client, load_github_app, AppConfig,
    ConfigSource, GithubAppClient, ServerState,
};

#[derive(clap::Parser)]
struct Opts {
    /// GitHub App ID.
    #[arg(long, env = "APP_ID")]
    app_id: u64,

    /// Path to the PEM file with the private key used to authenticate as the GitHub App.
    #[arg(long, env = "PRIVATE_KEY_PATH")]
    private_key_path: PathBuf,

    /// Secret used to authenticate webhooks.
    #[arg(long, env = "WEBHOOK_SECRET")]
    webhook_secret: String,

    /// Hostname of a GitHub Enterprise Server instance.
    #[arg(long, env = "ENTERPRISE_HOSTNAME")]
    enterprise_hostname: Option<String>,

    /// Port on which the webhook server listens.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Path of the webhook endpoint.
    #[arg(long, env = "WEBHOOK_PATH", default_value = DEFAULT_WEBHOOK_PATH)]
    webhook_path: String,

    /// File whose content is posted as a comment on every opened pull request.
    #[arg(long, env = "MESSAGE_PATH", default_value = DEFAULT_MESSAGE_PATH)]
    message_path: PathBuf,
}

impl From<Opts> for ConfigSource {
    fn from(opts: Opts) -> Self {
        ConfigSource {
            app_id: opts.app_id,
            private_key_path: opts.private_key_path,
            webhook_secret: opts.webhook_secret,
            enterprise_hostname: opts.enterprise_hostname,
            port: opts.port,
            webhook_path: opts.webhook_path,
            message_path: opts.message_path,
        }
    }
}

async fn server(app: Router, port: u16, webhook_path: &str) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind to {addr}"))?;

    tracing::info!("Server is listening for events at: http://localhost:{port}{webhook_path}");
    tracing::info!("Press Ctrl + C to quit.");
    axum::serve(listener, app).await?;
    Ok(())
}

fn try_main(opts: Opts) -> anyhow::Result<()> {
    let config = AppConfig::load(opts.into()).context("Invalid configuration")?;
    tracing::debug!("Loaded configuration: {config:?}");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Cannot build tokio runtime")?;

    let _guard = runtime.enter();
    let client = create_github_client(config.app_id, &config.api_url(), &config.private_key)?;
    runtime.block_on(load_github_app(&client))?;

    let router = create_event_router(&config.pr_comment_template)?;
    let state = ServerState::new(
        router,
        Arc::new(GithubAppClient::new(client)),
        config.webhook_secret,
    );
    let app = create_app(state, &config.webhook_path);

    runtime.block_on(server(app, config.port, &config.webhook_path))
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pr_task_bot=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let opts = Opts::parse();
    if let Err(error) = try_main(opts) {
        eprintln!("Error: {error:?}");
        std::process::exit(1);
    }
}
