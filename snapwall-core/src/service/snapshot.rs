//! Listing snapshot provider.
//!
//! Turns the object store's list primitive into ordered point-in-time
//! snapshots of an event's photos. Every call re-derives current state from
//! the store; nothing is cached between calls.

use crate::models::{EventId, PhotoRef, Snapshot, SnapshotPage};
use crate::service::photo_prefix;
use crate::storage::ObjectStore;
use crate::{Error, Result};

/// Largest page a paginated listing will return.
pub const MAX_PAGE_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct SnapshotService {
    store: ObjectStore,
}

impl SnapshotService {
    #[must_use]
    pub const fn new(store: ObjectStore) -> Self {
        Self { store }
    }

    /// Full snapshot of an event's photos, most-recently-modified first.
    ///
    /// Ties (and backends that report no timestamp) fall back to key order
    /// so a fixed store state always yields the same sequence — the change
    /// feed's fingerprinting depends on that stability.
    pub async fn snapshot(&self, event_id: &EventId) -> Result<Snapshot> {
        let keys = self.photo_keys(event_id).await?;
        let mut photos = self.resolve(keys).await?;
        sort_most_recent_first(&mut photos);
        Ok(photos)
    }

    /// Number of photos currently stored for the event.
    pub async fn count(&self, event_id: &EventId) -> Result<usize> {
        Ok(self.photo_keys(event_id).await?.len())
    }

    /// One page of the listing, resuming after `cursor`.
    ///
    /// Pages walk the store's native (lexicographic) key order so the
    /// cursor — the last key served — stays a plain resume-after marker;
    /// each page is then sorted most-recent-first for display. `limit` is
    /// clamped to `[1, MAX_PAGE_LIMIT]`. Cursors are not stable across
    /// interleaved uploads, and a cursor issued for a different event
    /// yields unspecified results.
    pub async fn snapshot_page(
        &self,
        event_id: &EventId,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<SnapshotPage> {
        let limit = limit.clamp(1, MAX_PAGE_LIMIT);
        let keys = self.photo_keys(event_id).await?;

        let start = match cursor {
            Some(cursor) => keys.partition_point(|k| k.as_str() <= cursor),
            None => 0,
        };
        let page_keys: Vec<String> = keys[start..].iter().take(limit).cloned().collect();
        let next_cursor = if start + page_keys.len() < keys.len() {
            page_keys.last().cloned()
        } else {
            None
        };

        let mut photos = self.resolve(page_keys).await?;
        sort_most_recent_first(&mut photos);

        Ok(SnapshotPage {
            photos,
            next_cursor,
        })
    }

    /// Recognized photo keys for the event, in native key order.
    async fn photo_keys(&self, event_id: &EventId) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self
            .store
            .list_keys(&photo_prefix(event_id))
            .await?
            .into_iter()
            // Defensive filter: only objects that look like photos for
            // this event count, whatever else lands under the prefix.
            .filter(|key| key.ends_with(".jpg"))
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn resolve(&self, keys: Vec<String>) -> Result<Vec<PhotoRef>> {
        let mut photos = Vec::with_capacity(keys.len());
        for key in keys {
            let modified_at = match self.store.last_modified(&key).await {
                Ok(modified_at) => modified_at,
                // Listed but gone by the time we stat it: skip the entry,
                // the listing is eventually consistent.
                Err(Error::NotFound(_)) => continue,
                Err(e) => return Err(e),
            };
            photos.push(PhotoRef {
                url: self.store.public_url(&key),
                key,
                modified_at,
            });
        }
        Ok(photos)
    }
}

fn sort_most_recent_first(photos: &mut [PhotoRef]) {
    photos.sort_by(|a, b| {
        b.modified_at
            .cmp(&a.modified_at)
            .then_with(|| a.key.cmp(&b.key))
    });
}
