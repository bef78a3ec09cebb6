use std::sync::Arc;

use anyhow::Context;
use common::storage::filesystem::FilesystemAssetStore;
use hub_server::config::AppConfig;
use hub_server::database::init_db;
use hub_server::state::AppState;
use hub_server::{bootstrap, build_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = init_db(&config.database.url)
        .await
        .context("failed to connect to database")?;

    let assets = Arc::new(
        FilesystemAssetStore::new(
            config.storage.assets_dir.clone(),
            config.storage.max_upload_size,
        )
        .await
        .context("failed to open assets directory")?,
    );

    bootstrap::run(&db, assets.clone(), &config).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config,
        assets,
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
