//! # SSO Core
//! 
//! Domain records, services, and the key-value store port for the SSO
//! application.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod keys;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::{DomainError, ErrorKind};
pub use repositories::{KeyValueStore, StoreError};
pub use services::{CredentialService, SessionService};
