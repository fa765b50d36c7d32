// HTTP error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for HTTP handlers
pub type AppResult<T> = Result<T, AppError>;

/// Application error with HTTP status code
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for AppError {}

/// Error response JSON structure
#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
    status: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status;
        let body = Json(ErrorResponse {
            error: self.message,
            status: status.as_u16(),
        });

        (status, body).into_response()
    }
}

/// Convert snapwall_core errors to HTTP errors
impl From<snapwall_core::Error> for AppError {
    fn from(err: snapwall_core::Error) -> Self {
        use snapwall_core::Error;

        match err {
            Error::InvalidIdentifier(msg) => AppError::bad_request(msg),
            Error::InvalidInput(msg) => AppError::bad_request(msg),
            Error::NotFound(msg) => AppError::not_found(msg),
            // Business rule, not a fault: the uploader is told why.
            Error::AdmissionDenied(reason) => AppError::forbidden(reason.to_string()),
            Error::StorageUnavailable(msg) => {
                tracing::error!("Storage error: {}", msg);
                AppError::service_unavailable("Storage temporarily unavailable")
            }
            Error::Serialization(e) => {
                tracing::error!("Serialization error: {}", e);
                AppError::internal_server_error("Data processing error")
            }
            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                AppError::internal_server_error("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapwall_core::{DenialReason, Error};

    #[test]
    fn test_admission_denied_maps_to_forbidden() {
        let err = AppError::from(Error::AdmissionDenied(DenialReason::CapacityReached));
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, "photo limit reached");
    }

    #[test]
    fn test_invalid_identifier_maps_to_bad_request() {
        let err = AppError::from(Error::InvalidIdentifier("bad".to_string()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_unavailable_maps_to_503() {
        let err = AppError::from(Error::StorageUnavailable("down".to_string()));
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        // Internal detail is not leaked to the client.
        assert_eq!(err.message, "Storage temporarily unavailable");
    }
}
