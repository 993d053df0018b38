//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps service and validation errors to HTTP status codes and returns JSON
//! bodies of the form `{"error": {"code", "message"}}`. Internal error
//! details are logged, never returned.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::service::ServiceError;
use crate::uploads::StorageError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed identifier, body, or argument (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The target already exists and may not be replaced (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Request body exceeds the configured limit (413).
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidArgument(msg) => Self::BadRequest(msg),
            err @ ServiceError::NotFound { .. } => Self::NotFound(err.to_string()),
            ServiceError::Storage(StorageError::AlreadyExists { .. }) => {
                Self::Conflict("a file is already stored for this version".to_string())
            }
            err @ (ServiceError::Store(_) | ServiceError::Storage(StorageError::Io(_))) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<reqdoc_core::ValidationError> for AppError {
    fn from(err: reqdoc_core::ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(err.body_text())
        } else {
            Self::BadRequest(err.body_text())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqdoc_core::DocumentId;

    #[test]
    fn not_found_status_code() {
        let err = AppError::NotFound("missing document".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn bad_request_status_code() {
        let err = AppError::BadRequest("malformed JSON".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "BAD_REQUEST");
    }

    #[test]
    fn internal_status_code() {
        let err = AppError::Internal("db connection failed".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
    }

    #[test]
    fn service_errors_map_by_kind() {
        let err: AppError = ServiceError::InvalidArgument("bad id".to_string()).into();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err: AppError = ServiceError::NotFound {
            entity: "document",
            id: DocumentId::new(4).to_string(),
        }
        .into();
        assert!(matches!(err, AppError::NotFound(ref m) if m.contains("document 4")));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = ServiceError::Storage(io.into()).into();
        assert!(matches!(err, AppError::Internal(_)));

        let err: AppError = ServiceError::Storage(StorageError::AlreadyExists {
            path: "/srv/uploads/1_Policy_2.pdf".into(),
        })
        .into();
        assert_eq!(err.status_and_code().0, StatusCode::CONFLICT);
        assert!(matches!(err, AppError::Conflict(ref m) if !m.contains("/srv")));
    }

    #[test]
    fn validation_error_is_bad_request() {
        let err: AppError = "abc"
            .parse::<DocumentId>()
            .map_err(AppError::from)
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn internal_error_body_hides_message() {
        use http_body_util::BodyExt;

        let response = AppError::Internal("secret detail".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert!(!body.error.message.contains("secret"));
    }

    #[tokio::test]
    async fn error_body_has_only_code_and_message() {
        use http_body_util::BodyExt;

        let response = AppError::BadRequest("missing multipart field 'file'".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let detail = body["error"].as_object().unwrap();
        let keys: Vec<&str> = detail.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["code", "message"]);
    }
}
