use std::sync::Arc;

use sso_core::{CredentialService, SessionService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialService>,
    pub sessions: Arc<SessionService>,
}
