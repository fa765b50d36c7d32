pub mod event;
pub mod id;
pub mod photo;

pub use event::EventMeta;
pub use id::{generate_id, EventId, PhotoId};
pub use photo::{PhotoRef, Snapshot, SnapshotPage};
