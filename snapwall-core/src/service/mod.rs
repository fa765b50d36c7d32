pub mod admission;
pub mod archive;
pub mod feed;
pub mod meta;
pub mod snapshot;
pub mod upload;

pub use admission::{Admission, AdmissionService};
pub use archive::ArchiveService;
pub use feed::{AlbumUpdate, ChangeFeed};
pub use meta::EventMetaService;
pub use snapshot::{SnapshotService, MAX_PAGE_LIMIT};
pub use upload::UploadService;

use crate::models::{EventId, PhotoId};

/// Object key prefix holding an event's photos.
pub(crate) fn photo_prefix(event_id: &EventId) -> String {
    format!("events/{event_id}/")
}

/// Object key for one photo.
pub(crate) fn photo_key(event_id: &EventId, photo_id: &PhotoId) -> String {
    format!("events/{event_id}/{photo_id}.jpg")
}

/// Object key for an event's banner image.
pub(crate) fn banner_key(event_id: &EventId) -> String {
    format!("banners/{event_id}.jpg")
}

/// Object key for an event's metadata record.
pub(crate) fn meta_key(event_id: &EventId) -> String {
    format!("meta/{event_id}.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let event = EventId::from_string("ev12345678".to_string());
        let photo = PhotoId::from_string("ph12345678".to_string());
        assert_eq!(photo_prefix(&event), "events/ev12345678/");
        assert_eq!(photo_key(&event, &photo), "events/ev12345678/ph12345678.jpg");
        assert_eq!(banner_key(&event), "banners/ev12345678.jpg");
        assert_eq!(meta_key(&event), "meta/ev12345678.json");
    }
}
