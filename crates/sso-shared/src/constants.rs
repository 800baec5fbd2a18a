//! Application-wide constants

/// Key prefix for user records
pub const USER_KEY_PREFIX: &str = "user_";
/// Key prefix for session records
pub const SESSION_KEY_PREFIX: &str = "sess_";

/// Sliding session lifetime in seconds
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 3600;
/// bcrypt work factor used for new password hashes
pub const DEFAULT_BCRYPT_COST: u32 = 14;

/// bcrypt only reads the first 72 bytes of its input
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Response header carrying a freshly minted session id
pub const SESSION_ID_HEADER: &str = "x-session-id";
