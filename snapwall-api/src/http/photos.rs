//! Album listing and photo upload.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::http::validation::validate_event_id;
use crate::http::{AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Page size. Absent or unparsable values mean a full, unpaginated
    /// listing.
    pub limit: Option<String>,
    /// Opaque continuation token from a previous page.
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPhotosResponse {
    pub event_name: Option<String>,
    pub max_photos: u32,
    pub upload_deadline: Option<DateTime<Utc>>,
    pub banner_url: Option<String>,
    pub photos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Current album state: event metadata plus the photo listing, full or
/// one page at a time.
pub async fn list_photos(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ListPhotosResponse>> {
    let event_id = validate_event_id(&event_id)?;
    let limit = query.limit.as_deref().and_then(|l| l.parse::<usize>().ok());

    let (meta, (photos, next_cursor)) = tokio::try_join!(state.meta.get(&event_id), async {
        match limit {
            Some(limit) => {
                let page = state
                    .snapshots
                    .snapshot_page(&event_id, limit, query.cursor.as_deref())
                    .await?;
                Ok((page.photos, page.next_cursor))
            }
            None => Ok((state.snapshots.snapshot(&event_id).await?, None)),
        }
    })?;

    Ok(Json(ListPhotosResponse {
        event_name: meta.as_ref().map(|m| m.name.clone()),
        max_photos: meta
            .as_ref()
            .and_then(|m| m.max_photos)
            .unwrap_or(state.album.default_capacity),
        upload_deadline: meta.as_ref().and_then(|m| m.upload_deadline),
        banner_url: meta.and_then(|m| m.banner_url),
        photos: photos.into_iter().map(|p| p.url).collect(),
        next_cursor,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPhotoResponse {
    pub photo_id: String,
}

/// Accept one photo upload (raw JPEG body, already normalized client-side).
pub async fn upload_photo(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    body: Bytes,
) -> AppResult<Json<UploadPhotoResponse>> {
    let event_id = validate_event_id(&event_id)?;
    let photo_id = state.uploads.upload_photo(&event_id, body).await?;
    Ok(Json(UploadPhotoResponse {
        photo_id: photo_id.to_string(),
    }))
}
