//! Pizzeria server binary

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pizzeria::api::{create_router, AppState};
use pizzeria::config::{AppConfig, LogFormat, PORT_ENV};
use pizzeria::store;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config)?;

    let profile = config.server.profile;
    tracing::info!(?profile, "Starting pizzeria");

    let state = if profile.needs_store() {
        let store_config = config
            .store_runtime()
            .context("invalid store configuration")?;

        // A failed connection is logged by `connect`; the server still starts
        let connection = store::connect(store_config).await;
        AppState::new(profile, connection)
    } else {
        AppState::standalone(profile)
    };

    let router = create_router(state, &config.server.interceptors);

    let env_port = std::env::var(PORT_ENV).ok();
    let port = config.server.resolve_port(env_port.as_deref())?;

    let addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!(%addr, "Listening for HTTP traffic");

    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.logging.level.clone()))
        .unwrap_or_else(|_| EnvFilter::new("pizzeria=info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format {
        LogFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }

    Ok(())
}
