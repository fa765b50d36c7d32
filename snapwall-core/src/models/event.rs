use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event metadata record.
///
/// Stored as a small JSON object in the metadata store, created once by the
/// host and mutated only by merge-on-write (callers read-modify-write, last
/// writer wins). The core fetches it fresh per operation and never caches
/// it across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMeta {
    pub name: String,
    /// Photo capacity; `None` means the configured default applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_photos: Option<u32>,
    /// Absolute upload deadline; uploads after this instant are denied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_deadline: Option<DateTime<Utc>>,
    /// Public reference to the event banner, set by the banner upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
}

impl EventMeta {
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            name,
            max_photos: None,
            upload_deadline: None,
            banner_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_json_is_camel_case() {
        let mut meta = EventMeta::new("Birthday".to_string());
        meta.max_photos = Some(10);
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"maxPhotos\":10"));
        assert!(!json.contains("uploadDeadline"));
        assert!(!json.contains("bannerUrl"));
    }

    #[test]
    fn test_meta_roundtrip_with_deadline() {
        let mut meta = EventMeta::new("Party".to_string());
        meta.upload_deadline = Some(Utc::now());
        let json = serde_json::to_string(&meta).unwrap();
        let parsed: EventMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, meta);
    }
}
