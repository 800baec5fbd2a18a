//! Domain services (business logic)

pub mod credential_service;
pub mod session_service;

pub use credential_service::CredentialService;
pub use session_service::SessionService;
