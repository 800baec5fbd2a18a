//! Password hashing with bcrypt
//!
//! Hashes are wrapped in standard base64 before they leave this module so the
//! stored value is plain ASCII regardless of the hash format.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sso_shared::constants::{DEFAULT_BCRYPT_COST, MAX_PASSWORD_BYTES};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
    #[error("Password exceeds 72 bytes")]
    TooLong,
    #[error("Stored hash is malformed: {0}")]
    MalformedHash(String),
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordService {
    cost: u32,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordService {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Salted bcrypt hash of `password`, base64 encoded. Two calls with the
    /// same input never return the same string.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong);
        }
        let hashed = bcrypt::hash(password, self.cost)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(STANDARD.encode(hashed))
    }

    /// Returns `Ok(false)` on a plain mismatch. Anything that prevents the
    /// comparison from running at all is a `MalformedHash`.
    ///
    /// bcrypt only reads the first 72 bytes, so longer input can never match
    /// a hash produced by [`PasswordService::hash`].
    pub fn verify(&self, password: &str, encoded_hash: &str) -> Result<bool, PasswordError> {
        let raw = STANDARD
            .decode(encoded_hash)
            .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
        let hash = String::from_utf8(raw)
            .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
        if password.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        bcrypt::verify(password, &hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the suite fast
    fn service() -> PasswordService {
        PasswordService::new(4)
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(PasswordService::default().cost(), 14);
    }

    #[test]
    fn test_hash_and_verify() {
        let svc = service();
        let hash = svc.hash("abc123").unwrap();
        assert!(hash.is_ascii());
        assert!(svc.verify("abc123", &hash).unwrap());
        assert!(!svc.verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let svc = service();
        let first = svc.hash("abc123").unwrap();
        let second = svc.hash("abc123").unwrap();
        assert_ne!(first, second);
        assert!(svc.verify("abc123", &first).unwrap());
        assert!(svc.verify("abc123", &second).unwrap());
    }

    #[test]
    fn test_stored_form_is_base64_bcrypt() {
        let hash = service().hash("abc123").unwrap();
        let decoded = String::from_utf8(STANDARD.decode(&hash).unwrap()).unwrap();
        assert!(decoded.starts_with("$2"));
    }

    #[test]
    fn test_rejects_long_password() {
        let long = "x".repeat(MAX_PASSWORD_BYTES + 1);
        assert!(matches!(service().hash(&long), Err(PasswordError::TooLong)));
    }

    #[test]
    fn test_verify_rejects_input_past_limit() {
        let svc = service();
        let password = "a".repeat(MAX_PASSWORD_BYTES);
        let hash = svc.hash(&password).unwrap();

        assert!(svc.verify(&password, &hash).unwrap());
        assert!(!svc.verify(&format!("{password}EXTRA"), &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash() {
        let svc = service();
        assert!(matches!(
            svc.verify("abc123", "%%% not base64 %%%"),
            Err(PasswordError::MalformedHash(_))
        ));
        let not_bcrypt = STANDARD.encode("plainly not a hash");
        assert!(matches!(
            svc.verify("abc123", &not_bcrypt),
            Err(PasswordError::MalformedHash(_))
        ));
    }
}
