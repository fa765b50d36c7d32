//! The push channel: change-detection feed framed as server-sent events.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
};
use futures::{Stream, StreamExt};

use crate::http::validation::validate_event_id;
use crate::http::{AppResult, AppState};

/// Open a per-connection change feed.
///
/// Emits a `retry` preamble immediately (the reconnection-interval hint),
/// then a `photos` event whenever the album's fingerprint changes. The
/// underlying feed is tick-bounded; when it ends the response body
/// completes and the connection closes, leaving reconnection to the
/// client. Client disconnects drop the stream, which tears down the
/// pending tick with it.
pub async fn photo_stream(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let event_id = validate_event_id(&event_id)?;

    let retry = Duration::from_millis(state.album.retry_millis);
    let preamble = futures::stream::once(std::future::ready(Ok(Event::default().retry(retry))));

    let updates = state.feed.updates(event_id).filter_map(|update| {
        std::future::ready(match Event::default().event("photos").json_data(&update) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping unserializable feed update");
                None
            }
        })
    });

    Ok(Sse::new(preamble.chain(updates)))
}
