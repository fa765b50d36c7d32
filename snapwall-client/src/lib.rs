//! Live album client.
//!
//! A session keeps one album view fresh over two channels. The push
//! channel opens the server's event stream and replays `photos` events
//! into the caller's callback; when it fails or closes without
//! delivering, the failure counter climbs, and at the threshold the
//! session falls back to plain interval polling of the listing
//! endpoint. The fallback is sticky: once polling, the session never
//! tries the stream again.
//!
//! Every wait inside the session races against the cancellation token,
//! and every callback invocation goes through a delivery gate that
//! `disconnect` closes under the same lock. `disconnect` therefore
//! returns only once any in-flight delivery has finished, and no
//! delivery starts after it returns.

mod sse;

pub use sse::{FrameTooLarge, SseFrame, SseParser};

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::StreamExt;
use serde::Deserialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Receives each fresh album view: the ordered photo URLs and the
/// total count.
pub type PhotoCallback = Arc<dyn Fn(Vec<String>, usize) + Send + Sync>;

/// Timing knobs for a sync session.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Pause between push-channel reconnection attempts.
    pub retry_interval: Duration,
    /// Pause between listing fetches once polling.
    pub poll_interval: Duration,
    /// Consecutive undelivered stream attempts before falling back.
    pub failure_threshold: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            retry_interval: Duration::from_secs(5),
            poll_interval: Duration::from_secs(5),
            failure_threshold: 3,
        }
    }
}

#[derive(Debug, Error)]
enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

/// Payload of a `photos` push event.
#[derive(Debug, Deserialize)]
struct AlbumUpdate {
    photos: Vec<String>,
    count: usize,
}

/// Listing response fields the client needs.
#[derive(Debug, Deserialize)]
struct Listing {
    photos: Vec<String>,
}

/// Serializes callback delivery against teardown.
///
/// A delivery holds the lock for the whole callback invocation;
/// `close` sets the flag under that same lock. Closing thus blocks
/// until an executing callback returns, and a delivery that loses the
/// race to `close` observes the flag and is discarded.
#[derive(Debug, Default)]
struct DeliveryGate {
    closed: Mutex<bool>,
}

impl DeliveryGate {
    /// Invoke the callback unless the gate is closed. Returns whether
    /// the delivery happened.
    fn deliver(&self, on_photos: &PhotoCallback, photos: Vec<String>, count: usize) -> bool {
        let closed = self.closed.lock().unwrap_or_else(PoisonError::into_inner);
        if *closed {
            return false;
        }
        on_photos(photos, count);
        true
    }

    fn close(&self) {
        *self.closed.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }
}

/// Handle to a running sync session. Dropping it disconnects.
#[derive(Debug)]
pub struct SyncSession {
    cancel: CancellationToken,
    gate: Arc<DeliveryGate>,
}

impl SyncSession {
    /// Stop the session. Safe to call more than once. Blocks until any
    /// callback currently executing has returned; after that, no
    /// further delivery can happen.
    pub fn disconnect(&self) {
        self.cancel.cancel();
        self.gate.close();
    }
}

impl Drop for SyncSession {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Start syncing one album. Updates arrive on `on_photos` until the
/// returned session is disconnected or dropped.
pub fn connect(
    base_url: &str,
    event_id: &str,
    config: SyncConfig,
    client: reqwest::Client,
    on_photos: PhotoCallback,
) -> SyncSession {
    let cancel = CancellationToken::new();
    let gate = Arc::new(DeliveryGate::default());
    let session = SyncSession {
        cancel: cancel.clone(),
        gate: Arc::clone(&gate),
    };

    let base_url = base_url.trim_end_matches('/').to_string();
    let event_id = event_id.to_string();
    tokio::spawn(async move {
        run_session(base_url, event_id, config, client, on_photos, gate, cancel).await;
    });

    session
}

async fn run_session(
    base_url: String,
    event_id: String,
    config: SyncConfig,
    client: reqwest::Client,
    on_photos: PhotoCallback,
    gate: Arc<DeliveryGate>,
    cancel: CancellationToken,
) {
    let stream_url = format!("{base_url}/api/photos/{event_id}/stream");
    let listing_url = format!("{base_url}/api/photos/{event_id}");

    let mut failures: u32 = 0;
    loop {
        match stream_once(&client, &stream_url, &on_photos, &gate, &cancel).await {
            StreamOutcome::Cancelled => return,
            StreamOutcome::Delivered => {
                failures = 0;
                debug!(event_id, "Push channel closed after delivering, reconnecting");
            }
            StreamOutcome::Failed => {
                failures += 1;
                debug!(event_id, failures, "Push channel attempt failed");
                // At the threshold the fallback's first pull happens
                // right away, without a retry wait.
                if failures >= config.failure_threshold {
                    break;
                }
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(config.retry_interval) => {}
        }
    }

    info!(event_id, "Push channel unavailable, switching to polling");
    poll_loop(
        &client,
        &listing_url,
        config.poll_interval,
        &on_photos,
        &gate,
        &cancel,
    )
    .await;
}

enum StreamOutcome {
    /// At least one `photos` event reached the callback.
    Delivered,
    /// Connection refused, rejected, or closed without delivering.
    Failed,
    Cancelled,
}

async fn stream_once(
    client: &reqwest::Client,
    url: &str,
    on_photos: &PhotoCallback,
    gate: &DeliveryGate,
    cancel: &CancellationToken,
) -> StreamOutcome {
    let response = tokio::select! {
        _ = cancel.cancelled() => return StreamOutcome::Cancelled,
        response = client.get(url).send() => response,
    };
    let response = match response {
        Ok(response) if response.status().is_success() => response,
        Ok(response) => {
            warn!(status = %response.status(), "Stream request rejected");
            return StreamOutcome::Failed;
        }
        Err(e) => {
            warn!(error = %e, "Stream request failed");
            return StreamOutcome::Failed;
        }
    };

    let mut body = response.bytes_stream();
    let mut parser = SseParser::new();
    let mut delivered = false;

    loop {
        let chunk = tokio::select! {
            _ = cancel.cancelled() => return StreamOutcome::Cancelled,
            chunk = body.next() => chunk,
        };
        match chunk {
            Some(Ok(bytes)) => {
                let frames = match parser.feed(&bytes) {
                    Ok(frames) => frames,
                    Err(FrameTooLarge) => {
                        warn!("Event stream exceeded the frame size bound, dropping connection");
                        return StreamOutcome::Failed;
                    }
                };
                for frame in frames {
                    if frame.event != "photos" {
                        continue;
                    }
                    // Malformed payloads are dropped, not fatal.
                    let Ok(update) = serde_json::from_str::<AlbumUpdate>(&frame.data) else {
                        warn!("Dropping undecodable push event");
                        continue;
                    };
                    if !gate.deliver(on_photos, update.photos, update.count) {
                        return StreamOutcome::Cancelled;
                    }
                    delivered = true;
                }
            }
            Some(Err(e)) => {
                warn!(error = %e, "Stream body error");
                return finished(delivered);
            }
            None => return finished(delivered),
        }
    }
}

fn finished(delivered: bool) -> StreamOutcome {
    if delivered {
        StreamOutcome::Delivered
    } else {
        StreamOutcome::Failed
    }
}

async fn poll_loop(
    client: &reqwest::Client,
    url: &str,
    interval: Duration,
    on_photos: &PhotoCallback,
    gate: &DeliveryGate,
    cancel: &CancellationToken,
) {
    loop {
        let listing = tokio::select! {
            _ = cancel.cancelled() => return,
            listing = fetch_listing(client, url) => listing,
        };
        match listing {
            Ok(listing) => {
                let count = listing.photos.len();
                if !gate.deliver(on_photos, listing.photos, count) {
                    return;
                }
            }
            // Transient fetch errors leave the last delivered view in place.
            Err(e) => warn!(error = %e, "Listing poll failed"),
        }

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

async fn fetch_listing(client: &reqwest::Client, url: &str) -> Result<Listing, FetchError> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }
    Ok(response.json().await?)
}
