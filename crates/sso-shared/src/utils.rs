//! Utility functions

use uuid::Uuid;

/// Hyphenated form only, the one `new_session_id` produces
pub fn is_valid_uuid(s: &str) -> bool {
    s.len() == 36 && Uuid::parse_str(s).is_ok()
}

/// Store keys are built by plain concatenation, so a key segment must not
/// carry whitespace or control characters.
pub fn is_key_safe(segment: &str) -> bool {
    !segment.chars().any(|c| c.is_whitespace() || c.is_control())
}
