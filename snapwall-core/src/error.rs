use thiserror::Error;

/// Why an upload was refused admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The event's upload deadline has passed.
    DeadlinePassed,
    /// The event already holds its configured maximum number of photos.
    CapacityReached,
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeadlinePassed => write!(f, "upload deadline has passed"),
            Self::CapacityReached => write!(f, "photo limit reached"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upload not admitted: {0}")]
    AdmissionDenied(DenialReason),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<opendal::Error> for Error {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            // Map missing objects to NotFound; everything else is a
            // transient or misconfigured store.
            opendal::ErrorKind::NotFound => Self::NotFound("Object not found".to_string()),
            _ => Self::StorageUnavailable(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
