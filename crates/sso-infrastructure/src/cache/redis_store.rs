//! Redis-backed key-value store

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{
    redis::{self, AsyncCommands, RedisError},
    Connection, Pool,
};
use sso_core::{KeyValueStore, StoreError};
use tracing::error;

/// Key-value store over a pooled Redis connection.
///
/// Expiry is Redis's own: keys are written with `PX` and Redis drops them.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<Connection, StoreError> {
        self.pool.get().await.map_err(|e| {
            error!("Error acquiring redis connection: {}", e);
            StoreError::Unavailable(e.to_string())
        })
    }
}

fn map_redis_error(op: &str, key: &str, e: RedisError) -> StoreError {
    error!("Error {} key {}: {}", op, key, e);
    if e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout() {
        StoreError::Unavailable(e.to_string())
    } else {
        StoreError::Command(e.to_string())
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| map_redis_error("getting", key, e))?;
        // An empty value is never written, treat it like a miss
        Ok(value.filter(|v| !v.is_empty()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        let result = if ttl.is_zero() {
            conn.set::<_, _, ()>(key, value).await
        } else {
            let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
            conn.pset_ex::<_, _, ()>(key, value, millis).await
        };
        result.map_err(|e| map_redis_error("writing", key, e))
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn().await?;
        conn.set_nx::<_, _, bool>(key, value)
            .await
            .map_err(|e| map_redis_error("writing", key, e))
    }

    async fn set_if_present(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError> {
        let mut conn = self.conn().await?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("XX");
        if !ttl.is_zero() {
            let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
            cmd.arg("PX").arg(millis);
        }
        // XX replies nil when the key is gone
        let reply: Option<String> = cmd
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("refreshing", key, e))?;
        Ok(reply.is_some())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        // DEL on a missing key returns 0, which is still success
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| map_redis_error("deleting", key, e))
    }
}
