// ============================================================================
// SSO Core - Session Service
// File: crates/sso-core/src/services/session_service.rs
// ============================================================================
//! Session lifecycle: create, read with sliding expiry, replace vars, destroy
//!
//! Reads and updates are a get followed by a conditional write, with no lock
//! in between. Two concurrent `set_session_vars` calls on one session are
//! last-write-wins. The write only lands on a live key, so a session destroyed
//! or expired in between stays gone.

use std::sync::Arc;
use std::time::Duration;

use sso_shared::{new_session_id, utils::is_valid_uuid};
use tracing::{debug, error, info};

use crate::domain::{SessionRecord, SessionVars};
use crate::error::DomainError;
use crate::keys::session_key;
use crate::repositories::KeyValueStore;

/// Owns session records in the key-value store
pub struct SessionService<S: KeyValueStore + ?Sized = dyn KeyValueStore> {
    store: Arc<S>,
    ttl: Duration,
}

impl<S: KeyValueStore + ?Sized> SessionService<S> {
    pub fn new(store: Arc<S>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Full lifetime a session gets on create and on every read or update
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a session for `username` and return its id
    pub async fn create_session(
        &self,
        username: &str,
        initial_vars: SessionVars,
    ) -> Result<String, DomainError> {
        let session_id = new_session_id();
        let session = SessionRecord::new(session_id.clone(), username.to_string(), initial_vars);

        let raw_session = encode(&session)?;
        self.store
            .set(&session_key(&session_id), &raw_session, self.ttl)
            .await
            .map_err(|e| {
                error!("Error writing session to store: {}", e);
                e
            })?;

        info!("Session created for: {}", username);
        Ok(session_id)
    }

    /// Look up a session and slide its expiry.
    ///
    /// An absent session is `Ok(None)`, as is one that disappears before its
    /// expiry is refreshed. If the refresh fails the record is withheld and
    /// the store error returned.
    pub async fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>, DomainError> {
        let Some((raw_session, session)) = self.load_session(session_id).await? else {
            return Ok(None);
        };

        // Same payload back under the same key, only the expiry changes
        let refreshed = self
            .store
            .set_if_present(&session_key(session_id), &raw_session, self.ttl)
            .await
            .map_err(|e| {
                error!("Error resetting session timeout: {}", e);
                e
            })?;

        if !refreshed {
            debug!("Session ended during read: {}", session_id);
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// Replace all session vars and slide the expiry. The session must exist.
    pub async fn set_session_vars(
        &self,
        session_id: &str,
        session_vars: SessionVars,
    ) -> Result<(), DomainError> {
        let Some((_, mut session)) = self.load_session(session_id).await? else {
            return Err(DomainError::SessionNotFound(session_id.to_string()));
        };

        session.replace_vars(session_vars);
        let raw_session = encode(&session)?;

        let written = self
            .store
            .set_if_present(&session_key(session_id), &raw_session, self.ttl)
            .await
            .map_err(|e| {
                error!("Error writing session vars: {}", e);
                e
            })?;

        if !written {
            debug!("Session ended during update: {}", session_id);
            return Err(DomainError::SessionNotFound(session_id.to_string()));
        }
        Ok(())
    }

    /// Delete a session. Deleting one that is already gone succeeds.
    pub async fn destroy_session(&self, session_id: &str) -> Result<(), DomainError> {
        if !is_valid_uuid(session_id) {
            debug!("Ignoring destroy for malformed session id");
            return Ok(());
        }

        self.store
            .delete(&session_key(session_id))
            .await
            .map_err(|e| {
                error!("Error deleting session from store: {}", e);
                e
            })?;

        info!("Session destroyed: {}", session_id);
        Ok(())
    }

    /// Single read path for every session lookup: absence is `None`, and
    /// each caller decides what absence means for it.
    async fn load_session(
        &self,
        session_id: &str,
    ) -> Result<Option<(String, SessionRecord)>, DomainError> {
        // Ids are always UUIDs; anything else cannot name a stored session
        if !is_valid_uuid(session_id) {
            debug!("Malformed session id treated as absent");
            return Ok(None);
        }

        let raw_session = self.store.get(&session_key(session_id)).await.map_err(|e| {
            error!("Error fetching session by id: {}", e);
            e
        })?;

        let Some(raw_session) = raw_session else {
            debug!("Session not found: {}", session_id);
            return Ok(None);
        };

        let mut session: SessionRecord = serde_json::from_str(&raw_session).map_err(|e| {
            error!("Error unmarshaling session data: {}", e);
            DomainError::SerializationError(e.to_string())
        })?;

        // Older writers stored the prefixed key as the id
        if session.id != session_id {
            session.id = session_id.to_string();
        }

        Ok(Some((raw_session, session)))
    }
}

fn encode(session: &SessionRecord) -> Result<String, DomainError> {
    serde_json::to_string(session).map_err(|e| {
        error!("Error marshaling session data: {}", e);
        DomainError::SerializationError(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::repositories::{MockKeyValueStore, StoreError};
    use mockall::predicate::*;
    use mockall::Sequence;

    const SESSION_ID: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";
    const SESSION_KEY: &str = "sess_67e55044-10b1-426f-9247-bb680e5fe0c8";
    const TTL: Duration = Duration::from_secs(3600);

    fn service(store: MockKeyValueStore) -> SessionService<MockKeyValueStore> {
        SessionService::new(Arc::new(store), TTL)
    }

    fn raw_session(vars: &[(&str, &str)]) -> String {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        serde_json::to_string(&SessionRecord::new(SESSION_ID.to_string(), "joehrke".to_string(), vars))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_session() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_set()
            .withf(|key, raw, ttl| {
                key.starts_with("sess_") && raw.contains(r#""username":"joehrke""#) && *ttl == TTL
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut vars = SessionVars::new();
        vars.insert("test_key".to_string(), "val".to_string());

        let session_id = service(store).create_session("joehrke", vars).await.unwrap();
        assert_eq!(session_id.len(), 36);
        assert!(is_valid_uuid(&session_id));
    }

    #[tokio::test]
    async fn test_create_session_store_error() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_set()
            .times(1)
            .returning(|_, _, _| Err(StoreError::Command("test redis error".into())));

        let err = service(store)
            .create_session("joehrke", SessionVars::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);
    }

    #[tokio::test]
    async fn test_get_session_slides_expiry() {
        let raw = raw_session(&[("test_key", "val")]);
        let expected_raw = raw.clone();

        let mut seq = Sequence::new();
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .with(eq(SESSION_KEY))
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(raw.clone())));
        store
            .expect_set_if_present()
            .withf(move |key, value, ttl| key == SESSION_KEY && value == expected_raw && *ttl == TTL)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(true));

        let session = service(store).get_session(SESSION_ID).await.unwrap().unwrap();
        assert_eq!(session.id, SESSION_ID);
        assert_eq!(session.username, "joehrke");
        assert_eq!(session.session_vars.get("test_key").map(String::as_str), Some("val"));
    }

    #[tokio::test]
    async fn test_get_session_absent() {
        let mut store = MockKeyValueStore::new();
        store.expect_get().times(1).returning(|_| Ok(None));

        assert!(service(store).get_session(SESSION_ID).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_session_malformed_id_skips_store() {
        let svc = service(MockKeyValueStore::new());
        assert!(svc.get_session("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_session_read_error() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("test redis error".into())));

        let err = service(store).get_session(SESSION_ID).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);
    }

    #[tokio::test]
    async fn test_get_session_unmarshal_error() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some(r#"{"id":"#.to_string())));

        let err = service(store).get_session(SESSION_ID).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }

    #[tokio::test]
    async fn test_get_session_withheld_when_refresh_fails() {
        let raw = raw_session(&[]);
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(raw.clone())));
        store
            .expect_set_if_present()
            .times(1)
            .returning(|_, _, _| Err(StoreError::Command("test redis error".into())));

        let result = service(store).get_session(SESSION_ID).await;
        assert!(matches!(result, Err(DomainError::StoreError(_))));
    }

    #[tokio::test]
    async fn test_get_session_normalizes_legacy_id() {
        let legacy = format!(
            r#"{{"id":"{}","username":"joehrke","sessionVars":null}}"#,
            SESSION_KEY
        );
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(legacy.clone())));
        store.expect_set_if_present().times(1).returning(|_, _, _| Ok(true));

        let session = service(store).get_session(SESSION_ID).await.unwrap().unwrap();
        assert_eq!(session.id, SESSION_ID);
        assert!(session.session_vars.is_empty());
    }

    #[tokio::test]
    async fn test_get_session_ended_before_refresh() {
        let raw = raw_session(&[]);
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(raw.clone())));
        store
            .expect_set_if_present()
            .times(1)
            .returning(|_, _, _| Ok(false));

        assert!(service(store).get_session(SESSION_ID).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_session_vars_replaces_wholesale() {
        let raw = raw_session(&[("old", "1")]);
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(raw.clone())));
        store
            .expect_set_if_present()
            .withf(|key, value, ttl| {
                let written: SessionRecord = serde_json::from_str(value).unwrap();
                key == SESSION_KEY
                    && *ttl == TTL
                    && written.session_vars.len() == 1
                    && written.session_vars.get("k").map(String::as_str) == Some("v")
            })
            .times(1)
            .returning(|_, _, _| Ok(true));

        let mut vars = SessionVars::new();
        vars.insert("k".to_string(), "v".to_string());
        assert!(service(store).set_session_vars(SESSION_ID, vars).await.is_ok());
    }

    #[tokio::test]
    async fn test_set_session_vars_absent() {
        let mut store = MockKeyValueStore::new();
        store.expect_get().times(1).returning(|_| Ok(None));

        let err = service(store)
            .set_session_vars(SESSION_ID, SessionVars::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn test_set_session_vars_ended_before_write() {
        let raw = raw_session(&[]);
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(raw.clone())));
        store
            .expect_set_if_present()
            .times(1)
            .returning(|_, _, _| Ok(false));

        let err = service(store)
            .set_session_vars(SESSION_ID, SessionVars::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn test_set_session_vars_malformed_id() {
        let err = service(MockKeyValueStore::new())
            .set_session_vars("nonexistent", SessionVars::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_set_session_vars_write_error() {
        let raw = raw_session(&[]);
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(raw.clone())));
        store
            .expect_set_if_present()
            .times(1)
            .returning(|_, _, _| Err(StoreError::Command("test redis error".into())));

        let err = service(store)
            .set_session_vars(SESSION_ID, SessionVars::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);
    }

    #[tokio::test]
    async fn test_destroy_session() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_delete()
            .with(eq(SESSION_KEY))
            .times(2)
            .returning(|_| Ok(()));

        let svc = service(store);
        assert!(svc.destroy_session(SESSION_ID).await.is_ok());
        assert!(svc.destroy_session(SESSION_ID).await.is_ok());
    }

    #[tokio::test]
    async fn test_destroy_session_store_error() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_delete()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("test redis error".into())));

        let err = service(store).destroy_session(SESSION_ID).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);
    }
}
