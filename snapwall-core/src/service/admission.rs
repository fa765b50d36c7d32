//! Upload admission control.
//!
//! Decides whether a new upload may proceed, from the event's metadata and
//! a fresh listing snapshot. The check and the subsequent write are not
//! transactional: two uploads can both pass admission and both land, so the
//! stored count may transiently exceed capacity by the number of
//! concurrently admitted requests. That is the accepted trade-off of
//! running against a coordination-free object store; do not bolt a lock on
//! here.

use chrono::Utc;

use crate::config::AlbumConfig;
use crate::models::EventId;
use crate::service::{EventMetaService, SnapshotService};
use crate::{DenialReason, Result};

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Denied(DenialReason),
}

impl Admission {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[derive(Debug, Clone)]
pub struct AdmissionService {
    meta: EventMetaService,
    snapshots: SnapshotService,
    default_capacity: u32,
}

impl AdmissionService {
    #[must_use]
    pub const fn new(
        meta: EventMetaService,
        snapshots: SnapshotService,
        config: &AlbumConfig,
    ) -> Self {
        Self {
            meta,
            snapshots,
            default_capacity: config.default_capacity,
        }
    }

    /// Check whether one more upload may proceed for this event.
    ///
    /// Metadata and the listing are independent reads, fetched in parallel.
    /// Deadline wins over capacity: an expired event reports
    /// `DeadlinePassed` regardless of count.
    pub async fn check(&self, event_id: &EventId) -> Result<Admission> {
        let (meta, count) = tokio::try_join!(
            self.meta.get(event_id),
            self.snapshots.count(event_id)
        )?;

        if let Some(deadline) = meta.as_ref().and_then(|m| m.upload_deadline) {
            if Utc::now() > deadline {
                return Ok(Admission::Denied(DenialReason::DeadlinePassed));
            }
        }

        let capacity = meta
            .as_ref()
            .and_then(|m| m.max_photos)
            .unwrap_or(self.default_capacity);
        if count as u64 >= u64::from(capacity) {
            return Ok(Admission::Denied(DenialReason::CapacityReached));
        }

        Ok(Admission::Allowed)
    }
}
