//! # SSO Security
//! 
//! Security utilities: password hashing.

pub mod password;

pub use password::{PasswordError, PasswordService};
