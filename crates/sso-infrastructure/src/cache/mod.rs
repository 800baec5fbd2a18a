//! Cache module (key-value store adapters)

pub mod connection;
pub mod memory_store;
pub mod redis_store;

pub use connection::{connect_store, create_pool};
pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
