use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reference to one stored photo, as observed by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    /// Object key in the store (e.g., `events/{event}/{photo}.jpg`).
    pub key: String,
    /// Public URL viewers load the photo from.
    pub url: String,
    /// Last-modified timestamp assigned by the object store. Some backends
    /// do not report one; those entries sort last.
    pub modified_at: Option<DateTime<Utc>>,
}

/// A point-in-time ordered listing of an event's photos,
/// most-recently-modified first. A view, never persisted.
pub type Snapshot = Vec<PhotoRef>;

/// One page of a paginated listing plus the continuation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPage {
    /// Page entries, most-recently-modified first within the page.
    pub photos: Vec<PhotoRef>,
    /// Opaque resume token; absent when the listing is exhausted.
    /// Valid only for the event it was issued for, and not guaranteed
    /// stable across interleaved uploads.
    pub next_cursor: Option<String>,
}
