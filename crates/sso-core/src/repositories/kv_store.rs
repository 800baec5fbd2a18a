//! Key-value store trait (port)

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store command failed: {0}")]
    Command(String),
}

/// String-keyed, string-valued store with native expiry.
///
/// The store is the only shared state in the system: services keep nothing
/// between calls, so every visibility and ordering guarantee comes from here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value`, replacing any previous one. `Duration::ZERO` means the
    /// key never expires; otherwise the expiry is reset to `ttl` from now.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Write `value` without expiry only if `key` is absent. Returns whether
    /// the write happened.
    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError>;

    /// Overwrite `value` and reset the expiry as `set` does, but only if a
    /// live `key` already exists. Returns whether the write happened.
    async fn set_if_present(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
