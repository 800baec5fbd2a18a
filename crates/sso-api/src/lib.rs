//! # SSO API
//! 
//! HTTP handlers, error mapping, and routing.

pub mod handlers;
pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
