//! Host banner upload.

use axum::{
    extract::{Path, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;

use crate::http::validation::validate_event_id;
use crate::http::{AppResult, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBannerResponse {
    pub banner_url: String,
}

/// Store the event banner and merge its URL into the event metadata.
pub async fn upload_banner(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    body: Bytes,
) -> AppResult<Json<UploadBannerResponse>> {
    let event_id = validate_event_id(&event_id)?;
    let banner_url = state.uploads.upload_banner(&event_id, body).await?;
    Ok(Json(UploadBannerResponse { banner_url }))
}
