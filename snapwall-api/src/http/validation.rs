//! Input validation for HTTP endpoints.
//!
//! Identifiers are rejected here, before any I/O happens.

use std::sync::LazyLock;

use regex::Regex;
use snapwall_core::models::EventId;

use crate::http::AppError;

/// Length bounds for identifiers
pub mod limits {
    /// Minimum event ID length; shorter values are rejected on every
    /// endpoint.
    pub const EVENT_ID_MIN: usize = 5;
    /// Maximum event ID length
    pub const EVENT_ID_MAX: usize = 64;
}

/// Valid event ID: the nanoid alphabet
static EVENT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid event_id regex"));

/// Validate a raw path segment as an event identifier.
pub fn validate_event_id(raw: &str) -> Result<EventId, AppError> {
    let trimmed = raw.trim();
    if trimmed.len() < limits::EVENT_ID_MIN {
        return Err(AppError::bad_request("Invalid event ID"));
    }
    if trimmed.len() > limits::EVENT_ID_MAX {
        return Err(AppError::bad_request("Invalid event ID"));
    }
    if !EVENT_ID.is_match(trimmed) {
        return Err(AppError::bad_request("Invalid event ID"));
    }
    Ok(EventId::from_string(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_nanoid_style_ids() {
        assert!(validate_event_id("V1StGXR8_Z").is_ok());
        assert!(validate_event_id("abcde").is_ok());
        assert!(validate_event_id("a-b_c-d_e").is_ok());
    }

    #[test]
    fn test_rejects_short_ids() {
        assert!(validate_event_id("").is_err());
        assert!(validate_event_id("abcd").is_err());
    }

    #[test]
    fn test_rejects_long_ids() {
        assert!(validate_event_id(&"a".repeat(65)).is_err());
        assert!(validate_event_id(&"a".repeat(64)).is_ok());
    }

    #[test]
    fn test_rejects_invalid_characters() {
        assert!(validate_event_id("abc/../etc").is_err());
        assert!(validate_event_id("abc de").is_err());
        assert!(validate_event_id("abc.jpg").is_err());
    }
}
