use anyhow::Context;
use query_gateway::config::LoggingConfig;
use query_gateway::{AppState, Config};
use reqwest_middleware::ClientBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let http = reqwest::Client::builder()
        .build()
        .context("failed to build HTTP client")?;
    let state = AppState::new(config, ClientBuilder::new(http).build());
    query_gateway::serve(state).await.context("server error")?;
    Ok(())
}

// RUST_LOG takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
