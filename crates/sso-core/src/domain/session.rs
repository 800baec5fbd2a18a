// ============================================================================
// SSO Core - Session Record
// File: crates/sso-core/src/domain/session.rs
// Description: Authenticated session, stored under `sess_<id>` with a sliding TTL
// ============================================================================

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Arbitrary application state attached to a session
pub type SessionVars = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub session_vars: SessionVars,
}

impl SessionRecord {
    pub fn new(id: String, username: String, session_vars: SessionVars) -> Self {
        Self {
            id,
            username,
            session_vars,
        }
    }

    /// Replace all session variables at once
    pub fn replace_vars(&mut self, session_vars: SessionVars) {
        self.session_vars = session_vars;
    }
}

// Older writers stored an empty map as `null`
fn null_as_empty<'de, D>(deserializer: D) -> Result<SessionVars, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<SessionVars>::deserialize(deserializer)?.unwrap_or_default())
}
