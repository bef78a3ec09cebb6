use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::workflow::SupplementPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of issued tokens in days.
    pub token_ttl_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root of the served `/assets` tree (contains `uploads/` and `imgs/`).
    pub assets_dir: PathBuf,
    /// Maximum accepted upload size in bytes.
    pub max_upload_size: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub supplement_policy: SupplementPolicy,
}

/// Initial admin account, created only when the user table is empty.
#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapConfig {
    pub admin_username: String,
    pub admin_password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("server.cors.allow_origins", vec!["*"])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.token_ttl_days", 7)?
            .set_default("storage.assets_dir", "./assets")?
            .set_default("storage.max_upload_size", 16 * 1024 * 1024)?
            .set_default("workflow.supplement_policy", "overwrite")?
            .set_default("bootstrap.admin_username", "admin")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., HUB__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("HUB").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
