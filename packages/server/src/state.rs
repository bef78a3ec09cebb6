use std::sync::Arc;

use common::storage::AssetStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::workflow::ResourceService;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub assets: Arc<dyn AssetStore>,
}

impl AppState {
    pub fn resources(&self) -> ResourceService {
        ResourceService::new(
            self.db.clone(),
            self.assets.clone(),
            self.config.workflow.supplement_policy,
        )
    }
}
