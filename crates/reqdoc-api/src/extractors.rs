//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs and helpers to extract
//! and validate JSON bodies, path keys, and multipart file fields.

use std::str::FromStr;

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use reqdoc_core::ValidationError;

use crate::error::AppError;

/// Trait for request types that can validate their business rules
/// beyond what serde deserialization checks.
pub trait Validate {
    /// Validate business rules. Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::BadRequest)?;
    Ok(value)
}

/// Extract a query string, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result
        .map(|Query(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Accept a multipart body, mapping a missing or invalid boundary to
/// [`AppError::BadRequest`].
pub fn extract_multipart(
    result: Result<Multipart, MultipartRejection>,
) -> Result<Multipart, AppError> {
    result.map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Parse a typed key from a raw path segment.
pub fn parse_key<K>(raw: &str) -> Result<K, AppError>
where
    K: FromStr<Err = ValidationError>,
{
    raw.parse().map_err(AppError::from)
}

/// A file received in a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    /// Client-supplied file name, empty if none was sent.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Read the multipart field called `name`, skipping any other fields.
pub async fn extract_file(
    multipart: &mut Multipart,
    name: &str,
) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(name) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?.to_vec();
        return Ok(UploadedFile { file_name, bytes });
    }
    Err(AppError::BadRequest(format!(
        "missing multipart field '{name}'"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqdoc_core::VersionId;

    #[derive(Debug)]
    struct Named(String);

    impl Validate for Named {
        fn validate(&self) -> Result<(), String> {
            if self.0.is_empty() {
                Err("name must not be empty".to_string())
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn validated_json_rejects_invalid() {
        let err = extract_validated_json(Ok(Json(Named(String::new())))).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("empty")));
        assert!(extract_validated_json(Ok(Json(Named("x".to_string())))).is_ok());
    }

    #[tokio::test]
    async fn multipart_without_boundary_is_bad_request() {
        use axum::body::Body;
        use axum::extract::FromRequest;
        use axum::http::{header, Request};

        let request = Request::builder()
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::empty())
            .unwrap();
        let result = Multipart::from_request(request, &()).await;
        assert!(matches!(
            extract_multipart(result),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn parse_key_maps_to_bad_request() {
        let id: VersionId = parse_key("12").unwrap();
        assert_eq!(id.get(), 12);
        assert!(matches!(
            parse_key::<VersionId>("twelve"),
            Err(AppError::BadRequest(_))
        ));
    }
}
