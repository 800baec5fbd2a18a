//! HTTP handlers

pub mod health;
pub mod sessions;
pub mod users;
