//! Change-detection feed.
//!
//! Converts the pull-based listing primitive into a push feed: a bounded
//! per-connection loop that snapshots the event every tick, fingerprints
//! the ordered reference list, and yields an update only when the
//! fingerprint changed. Uploads are rare next to viewer counts, so
//! forwarding on change only keeps the payload volume proportional to
//! actual activity.

use std::time::Duration;

use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::config::AlbumConfig;
use crate::models::EventId;
use crate::service::SnapshotService;

/// One change event: the full current list and its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumUpdate {
    pub photos: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct ChangeFeed {
    snapshots: SnapshotService,
    tick: Duration,
    max_ticks: u32,
}

struct FeedState {
    snapshots: SnapshotService,
    event_id: EventId,
    tick: Duration,
    ticks_done: u32,
    max_ticks: u32,
    last_fingerprint: String,
}

impl ChangeFeed {
    #[must_use]
    pub fn new(snapshots: SnapshotService, config: &AlbumConfig) -> Self {
        Self {
            snapshots,
            tick: Duration::from_secs(config.feed_tick_seconds),
            max_ticks: config.feed_max_ticks,
        }
    }

    /// Test hook: a feed with explicit timing.
    #[must_use]
    pub const fn with_timing(snapshots: SnapshotService, tick: Duration, max_ticks: u32) -> Self {
        Self {
            snapshots,
            tick,
            max_ticks,
        }
    }

    /// Stream of album updates for one connection.
    ///
    /// The first tick runs immediately; the fingerprint starts empty, so
    /// the first successful snapshot always yields the current state.
    /// Snapshot failures are swallowed — transient storage faults never
    /// terminate the loop, the next tick retries. The stream ends after
    /// `max_ticks` ticks, capping how long one connection holds server
    /// resources; clients reconnect. Dropping the stream cancels any
    /// pending tick, so nothing fires past channel closure.
    pub fn updates(&self, event_id: EventId) -> impl Stream<Item = AlbumUpdate> + Send {
        let state = FeedState {
            snapshots: self.snapshots.clone(),
            event_id,
            tick: self.tick,
            ticks_done: 0,
            max_ticks: self.max_ticks,
            last_fingerprint: String::new(),
        };

        futures::stream::unfold(state, |mut state| async move {
            if state.ticks_done >= state.max_ticks {
                return None;
            }
            if state.ticks_done > 0 {
                tokio::time::sleep(state.tick).await;
            }
            state.ticks_done += 1;

            let emitted = match state.snapshots.snapshot(&state.event_id).await {
                Ok(snapshot) => {
                    let photos: Vec<String> = snapshot.into_iter().map(|p| p.url).collect();
                    let fingerprint = fingerprint(&photos);
                    if fingerprint == state.last_fingerprint {
                        None
                    } else {
                        state.last_fingerprint = fingerprint;
                        let count = photos.len();
                        Some(AlbumUpdate { photos, count })
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        event_id = state.event_id.as_str(),
                        error = %e,
                        "Snapshot failed, skipping tick"
                    );
                    None
                }
            };

            Some((emitted, state))
        })
        .filter_map(std::future::ready)
    }
}

/// Cheap stable summary of an ordered reference list.
fn fingerprint(photos: &[String]) -> String {
    serde_json::to_string(photos).unwrap_or_default()
}
