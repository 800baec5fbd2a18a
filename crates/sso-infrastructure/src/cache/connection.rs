//! Store connection setup

use std::sync::Arc;
use std::time::Duration;

use deadpool_redis::{redis, Config, Pool, PoolConfig, Runtime};
use sso_core::{KeyValueStore, StoreError};
use sso_shared::config::RedisSettings;
use tracing::info;

use super::{MemoryStore, RedisStore};

const MEMORY_URL_SCHEME: &str = "memory://";
const MEMORY_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

pub fn create_pool(url: &str, max_connections: usize) -> Result<Pool, StoreError> {
    let mut config = Config::from_url(url);
    config.pool = Some(PoolConfig::new(max_connections));
    config
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| StoreError::Unavailable(e.to_string()))
}

/// Build the store named by `settings.url` and make sure it answers.
///
/// `memory://` selects the in-process store, anything else is handed to
/// Redis.
pub async fn connect_store(settings: &RedisSettings) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    if settings.url.starts_with(MEMORY_URL_SCHEME) {
        info!("Using in-process memory store");
        let store = MemoryStore::new();
        store.spawn_cleanup(MEMORY_CLEANUP_INTERVAL);
        return Ok(Arc::new(store));
    }

    let pool = create_pool(&settings.url, settings.max_connections)?;
    let mut conn = pool
        .get()
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    redis::cmd("PING")
        .query_async::<String>(&mut conn)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

    info!("Redis connection established (pool size {})", settings.max_connections);
    Ok(Arc::new(RedisStore::new(pool)))
}
