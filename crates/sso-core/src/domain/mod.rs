//! # SSO Core - Domain Module
//! 
//! Records persisted in the key-value store.

pub mod user;
pub mod session;

pub use user::UserRecord;
pub use session::{SessionRecord, SessionVars};
