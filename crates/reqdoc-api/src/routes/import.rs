//! # CSV Import API

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_file, extract_multipart};
use crate::import::{import_csv, ImportSummary};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportResponse {
    pub message: String,
    pub summary: ImportSummary,
}

/// Multipart form for a CSV import.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CsvUploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/upload-csv", post(upload_csv))
}

/// POST /upload-csv: Bulk import requirements and documents from CSV.
///
/// Row-level failures are reported in the summary, not as an error status.
#[utoipa::path(
    post,
    path = "/upload-csv",
    request_body(content = CsvUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Import finished", body = ImportResponse),
        (status = 400, description = "Missing file field", body = crate::error::ErrorBody),
    ),
    tag = "import"
)]
async fn upload_csv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImportResponse>, AppError> {
    let mut multipart = extract_multipart(multipart)?;
    let file = extract_file(&mut multipart, "file").await?;
    tracing::info!(file_name = %file.file_name, size = file.bytes.len(), "CSV import requested");
    let summary = import_csv(&state.repository, &file.bytes).await;
    Ok(Json(ImportResponse {
        message: "CSV imported successfully".to_string(),
        summary,
    }))
}
