// ============================================================================
// SSO Core - User Record
// File: crates/sso-core/src/domain/user.rs
// Description: Registered user, stored under `user_<username>` without expiry
// ============================================================================

use serde::{Deserialize, Serialize};
use sso_shared::utils::is_key_safe;
use validator::Validate;

use crate::error::DomainError;

/// Registered user. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UserRecord {
    #[validate(length(min = 1, max = 64, message = "Username must be between 1 and 64 characters"))]
    pub username: String,

    /// Encoded password hash, never the plaintext
    #[serde(rename = "hashedPass")]
    #[validate(length(min = 1, message = "Password hash is required"))]
    pub hashed_password: String,
}

impl UserRecord {
    /// Create a new user record
    pub fn new(username: String, hashed_password: String) -> Result<Self, DomainError> {
        let user = Self {
            username,
            hashed_password,
        };

        user.validate()?;
        Self::validate_username(&user.username)?;
        Ok(user)
    }

    /// Username rules on their own, for checks that run before a hash exists
    pub fn validate_username(username: &str) -> Result<(), DomainError> {
        let length = username.chars().count();
        if !(1..=64).contains(&length) {
            return Err(DomainError::ValidationError(
                "Username must be between 1 and 64 characters".to_string(),
            ));
        }
        if !is_key_safe(username) {
            return Err(DomainError::ValidationError(
                "Username must not contain whitespace or control characters".to_string(),
            ));
        }
        Ok(())
    }
}
