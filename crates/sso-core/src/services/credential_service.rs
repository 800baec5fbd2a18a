// ============================================================================
// SSO Core - Credential Service
// File: crates/sso-core/src/services/credential_service.rs
// ============================================================================
//! Password hashing, user registration and credential checks

use std::sync::Arc;

use sso_security::PasswordService;
use tracing::{debug, error, info, warn};

use crate::domain::UserRecord;
use crate::error::DomainError;
use crate::keys::user_key;
use crate::repositories::KeyValueStore;

/// Owns user records in the key-value store
pub struct CredentialService<S: KeyValueStore + ?Sized = dyn KeyValueStore> {
    store: Arc<S>,
    passwords: PasswordService,
}

impl<S: KeyValueStore + ?Sized> CredentialService<S> {
    pub fn new(store: Arc<S>, passwords: PasswordService) -> Self {
        Self { store, passwords }
    }

    /// Salted, adaptive-cost hash of `plain`, safe to store as a string.
    ///
    /// bcrypt is CPU bound, so it runs on the blocking pool.
    pub async fn hash_password(&self, plain: &str) -> Result<String, DomainError> {
        let passwords = self.passwords;
        let plain = plain.to_owned();

        tokio::task::spawn_blocking(move || passwords.hash(&plain))
            .await
            .map_err(|e| DomainError::InternalError(e.to_string()))?
            .map_err(|e| {
                error!("Error generating password hash: {}", e);
                DomainError::from(e)
            })
    }

    /// Reject a username that registration would refuse, before the caller
    /// spends a bcrypt hash on it.
    ///
    /// Advisory only: `create_user` still decides the race for a free name.
    pub async fn check_username_available(&self, username: &str) -> Result<(), DomainError> {
        UserRecord::validate_username(username)?;

        let existing = self.store.get(&user_key(username)).await.map_err(|e| {
            error!("Error fetching user {}: {}", username, e);
            e
        })?;

        if existing.is_some() {
            warn!("Registration rejected: username already taken: {}", username);
            return Err(DomainError::UsernameTaken(username.to_string()));
        }
        Ok(())
    }

    /// Register a new user
    pub async fn create_user(&self, username: &str, hashed_password: &str) -> Result<(), DomainError> {
        let user = UserRecord::new(username.to_string(), hashed_password.to_string())?;

        let raw_user = serde_json::to_string(&user).map_err(|e| {
            error!("Error marshaling user data: {}", e);
            DomainError::SerializationError(e.to_string())
        })?;

        // Existence check and write in one conditional store operation
        let created = self
            .store
            .set_if_absent(&user_key(&user.username), &raw_user)
            .await
            .map_err(|e| {
                error!("Error writing user to store: {}", e);
                e
            })?;

        if !created {
            warn!("Registration failed: username already taken: {}", username);
            return Err(DomainError::UsernameTaken(username.to_string()));
        }

        info!("Registration successful for: {}", username);
        Ok(())
    }

    /// Check `plain` against the stored hash for `username`.
    ///
    /// `Ok(false)` is a plain mismatch. An unknown user is
    /// `Err(DomainError::UserNotFound)`, which callers treat as an expected
    /// outcome rather than a failure.
    pub async fn authenticate_user(&self, username: &str, plain: &str) -> Result<bool, DomainError> {
        let raw_user = self.store.get(&user_key(username)).await.map_err(|e| {
            error!("Error fetching user {}: {}", username, e);
            e
        })?;

        let Some(raw_user) = raw_user else {
            debug!("Authentication for unknown user: {}", username);
            return Err(DomainError::UserNotFound(username.to_string()));
        };

        let user: UserRecord = serde_json::from_str(&raw_user).map_err(|e| {
            error!("Error unmarshaling user data for {}: {}", username, e);
            DomainError::SerializationError(e.to_string())
        })?;

        let passwords = self.passwords;
        let plain = plain.to_owned();
        let stored_hash = user.hashed_password;

        let matched = tokio::task::spawn_blocking(move || passwords.verify(&plain, &stored_hash))
            .await
            .map_err(|e| DomainError::InternalError(e.to_string()))?
            .map_err(|e| {
                error!("Error comparing password hash for {}: {}", username, e);
                DomainError::from(e)
            })?;

        if matched {
            info!("Authentication successful for: {}", username);
        } else {
            info!("Authentication failed: password mismatch for: {}", username);
        }
        Ok(matched)
    }
}
