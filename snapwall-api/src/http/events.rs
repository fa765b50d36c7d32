//! Event creation and the event landing summary.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snapwall_core::models::EventMeta;

use crate::http::validation::validate_event_id;
use crate::http::{AppError, AppResult, AppState};

const EVENT_NAME_MAX: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub name: String,
    pub max_photos: Option<u32>,
    pub upload_deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventResponse {
    pub event_id: String,
}

/// Create a new event album
pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> AppResult<Json<CreateEventResponse>> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Event name is required"));
    }
    if name.len() > EVENT_NAME_MAX {
        return Err(AppError::bad_request("Event name is too long"));
    }
    if let Some(max_photos) = request.max_photos {
        if max_photos == 0 {
            return Err(AppError::bad_request("maxPhotos must be positive"));
        }
    }

    let mut meta = EventMeta::new(name.to_string());
    meta.max_photos = request.max_photos;
    meta.upload_deadline = request.upload_deadline;

    let event_id = state.meta.create_event(meta).await?;
    Ok(Json(CreateEventResponse {
        event_id: event_id.to_string(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummaryResponse {
    pub event_id: String,
    pub event_name: Option<String>,
    pub first_photo: Option<String>,
}

/// Event landing summary: name and the most recent photo.
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> AppResult<Json<EventSummaryResponse>> {
    let event_id = validate_event_id(&event_id)?;

    // Metadata and listing are independent; fetch both at once.
    let (meta, snapshot) = tokio::try_join!(
        state.meta.get(&event_id),
        state.snapshots.snapshot(&event_id)
    )?;

    Ok(Json(EventSummaryResponse {
        event_id: event_id.to_string(),
        event_name: meta.map(|m| m.name),
        first_photo: snapshot.into_iter().next().map(|p| p.url),
    }))
}
