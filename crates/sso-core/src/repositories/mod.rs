//! Repository traits (ports)

pub mod kv_store;

pub use kv_store::{KeyValueStore, StoreError};

#[cfg(test)]
pub use kv_store::MockKeyValueStore;
