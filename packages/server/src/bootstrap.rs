//! Startup routine. Safe to run on every start.

use std::sync::Arc;

use anyhow::Context;
use common::storage::AssetStore;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::AppConfig;
use crate::database::sync_schema;
use crate::seed::seed_admin;
use crate::workflow::ResourceService;

/// Sync the schema, seed the first admin, then heal staged image references
/// left on approved resources.
pub async fn run(
    db: &DatabaseConnection,
    store: Arc<dyn AssetStore>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    sync_schema(db).await.context("schema sync failed")?;

    seed_admin(db, &config.bootstrap)
        .await
        .context("admin seeding failed")?;

    let service = ResourceService::new(db.clone(), store, config.workflow.supplement_policy);
    service
        .heal_all()
        .await
        .context("path healing scan failed")?;

    info!("Bootstrap complete");
    Ok(())
}
