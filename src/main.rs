//! Gateway binary: load config from the environment, connect, serve.

use tablegate::{gateway_router, load_from_env, AppState, DbPool};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tablegate=info,tower_http=info")),
        )
        .init();

    let config = load_from_env()?;
    tracing::info!(connection = ?config.connection, resolution = ?config.resolution, "configuration loaded");

    let pool = DbPool::connect(&config.connection).await?;
    let state = AppState::new(pool, config.resolution);
    let app = gateway_router(state, config.body_limit);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("tablegate listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
