//! Album download as a single zip archive.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::http::validation::validate_event_id;
use crate::http::{AppResult, AppState};

/// Package every current photo into a zip download. 404 when the album
/// holds no photos.
pub async fn download_album(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> AppResult<Response> {
    let event_id = validate_event_id(&event_id)?;
    let (filename, bytes) = state.archive.build_zip(&event_id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
