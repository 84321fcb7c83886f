use crate::config::AppConfig;
use crate::db;
use crate::storage::{LocalStorage, StorageClient};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn StorageClient>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = db::connect(&config.database_url).await?;
        db::migrate(&db).await?;

        let storage =
            Arc::new(LocalStorage::new(&config.upload_dir).await?) as Arc<dyn StorageClient>;

        Ok(Self::from_parts(db, config, storage))
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>, storage: Arc<dyn StorageClient>) -> Self {
        Self {
            db,
            config,
            storage,
        }
    }

    /// In-memory database; the caller supplies storage and the demo flag.
    #[cfg(test)]
    pub async fn fake_with(enable_demo_sqli: bool, storage: Arc<dyn StorageClient>) -> Self {
        let db = db::memory().await;
        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            session: crate::config::SessionConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            upload_dir: "unused".into(),
            max_upload_bytes: 1024 * 1024,
            enable_demo_sqli,
            host: "127.0.0.1".into(),
            port: 0,
        });
        Self::from_parts(db, config, storage)
    }
}
