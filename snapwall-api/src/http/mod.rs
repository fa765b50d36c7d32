// Module: http
// HTTP/JSON REST API plus the SSE photo feed

pub mod banner;
pub mod download;
pub mod error;
pub mod events;
pub mod photos;
pub mod stream;
pub mod validation;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use snapwall_core::config::AlbumConfig;
use snapwall_core::service::{
    AdmissionService, ArchiveService, ChangeFeed, EventMetaService, SnapshotService,
    UploadService,
};
use snapwall_core::ObjectStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub snapshots: SnapshotService,
    pub meta: EventMetaService,
    pub uploads: UploadService,
    pub archive: ArchiveService,
    pub feed: ChangeFeed,
    pub album: AlbumConfig,
}

impl AppState {
    /// Wire the service graph on top of one object store.
    #[must_use]
    pub fn new(store: ObjectStore, album: AlbumConfig) -> Self {
        let snapshots = SnapshotService::new(store.clone());
        let meta = EventMetaService::new(store.clone());
        let admission = AdmissionService::new(meta.clone(), snapshots.clone(), &album);
        let uploads = UploadService::new(store.clone(), admission, meta.clone());
        let archive = ArchiveService::new(store, snapshots.clone(), meta.clone());
        let feed = ChangeFeed::new(snapshots.clone(), &album);

        Self {
            snapshots,
            meta,
            uploads,
            archive,
            feed,
            album,
        }
    }
}

/// Create the HTTP router with all routes
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    let router = Router::new()
        // Event lifecycle
        .route("/api/events", post(events::create_event))
        .route("/api/events/{event_id}", get(events::get_event))
        // Album listing and uploads
        .route("/api/photos/{event_id}", get(photos::list_photos))
        .route("/api/photos/{event_id}", post(photos::upload_photo))
        // Live push channel
        .route("/api/photos/{event_id}/stream", get(stream::photo_stream))
        // Archive download
        .route(
            "/api/photos/{event_id}/download",
            get(download::download_album),
        )
        // Host banner upload
        .route("/api/banner/{event_id}", post(banner::upload_banner));

    // Apply layers before state
    let router = router
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    router.with_state(state)
}
