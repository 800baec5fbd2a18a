//! Store key namespacing
//!
//! One flat keyspace, no escaping: callers validate segments before they get
//! here (`UserRecord::new`, session id parsing).

use sso_shared::constants::{SESSION_KEY_PREFIX, USER_KEY_PREFIX};

pub fn user_key(username: &str) -> String {
    format!("{USER_KEY_PREFIX}{username}")
}

pub fn session_key(session_id: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{session_id}")
}
