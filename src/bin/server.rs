use anyhow::Context;
use repo_analyst::api::{create_app, AppState};
use repo_analyst::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::load().context("failed to load configuration")?;
    tokio::fs::create_dir_all(&config.export_dir)
        .await
        .with_context(|| format!("failed to create {}", config.export_dir.display()))?;
    let bind_addr = config.server.bind_addr.clone();

    info!("GitHub Repo Analyst web server starting...");
    info!(
        "Narrative strategy: {}",
        if config.llm_enabled() { "external-model" } else { "rule-based" }
    );
    if config.api_keys.github_token.is_none() {
        info!("GITHUB_TOKEN not set, using anonymous (rate-limited) GitHub access");
    }
    info!("Export directory: {}", config.export_dir.display());

    let app = create_app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Server listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
