use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Closed set of failure classes a message store can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// The write or delete condition did not hold.
    ConditionFailed,
    Throttled,
    Unavailable,
    Unknown,
}

/// Failure reported by a [`MessageStore`](crate::adapters::storage::MessageStore).
///
/// `message` is the backend's own text and is what callers eventually see.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct StorageError {
    pub kind: StorageErrorKind,
    pub message: String,
}

impl StorageError {
    #[must_use]
    pub fn new(kind: StorageErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    #[must_use]
    pub const fn is_condition_failed(&self) -> bool {
        matches!(self.kind, StorageErrorKind::ConditionFailed)
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Storage(e) => {
                if e.kind == StorageErrorKind::Throttled {
                    tracing::warn!(error = %e, kind = ?e.kind, "Storage throttled");
                } else {
                    tracing::error!(error = %e, kind = ?e.kind, "Storage error");
                }
                e.message
            }
            Self::NotFound(msg) => {
                tracing::debug!(message = %msg, "Resource not found");
                msg
            }
            Self::BadRequest(msg) => {
                tracing::debug!(message = %msg, "Bad request");
                msg
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::BadRequest("text is required".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("message not found".into()).status(), StatusCode::NOT_FOUND);

        for kind in [
            StorageErrorKind::ConditionFailed,
            StorageErrorKind::Throttled,
            StorageErrorKind::Unavailable,
            StorageErrorKind::Unknown,
        ] {
            let err = AppError::from(StorageError::new(kind, "backend said no"));
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_storage_error_displays_backend_message_verbatim() {
        let err = StorageError::new(StorageErrorKind::Throttled, "Rate of requests exceeds the allowed throughput.");
        assert_eq!(err.to_string(), "Rate of requests exceeds the allowed throughput.");
        assert!(!err.is_condition_failed());
        assert!(StorageError::new(StorageErrorKind::ConditionFailed, "x").is_condition_failed());
    }
}
