//! Common types

use uuid::Uuid;

pub type EntityId = Uuid;

pub fn new_id() -> EntityId {
    Uuid::new_v4()
}

/// Fresh session identifier in hyphenated form (36 chars)
pub fn new_session_id() -> String {
    new_id().hyphenated().to_string()
}
