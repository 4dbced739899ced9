use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::Db;

/// Process-wide context: built once in `main`, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = Db::connect(&config.database_url).await?;
        Ok(Self { db, config })
    }

    pub fn from_parts(db: Db, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    /// State over a lazy in-memory pool, for unit tests that never run a
    /// query.
    pub fn fake() -> Self {
        let db = Db::connect_lazy("sqlite::memory:").expect("lazy pool ok");
        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
        });
        Self { db, config }
    }
}
