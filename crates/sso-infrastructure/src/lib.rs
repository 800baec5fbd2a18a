//! # SSO Infrastructure
//! 
//! Key-value store implementations (adapters).

pub mod cache;

pub use cache::{connect_store, MemoryStore, RedisStore};
