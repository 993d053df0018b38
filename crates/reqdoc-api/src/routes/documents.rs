//! # Documents API
//!
//! Documents, their version history, and file uploads. An upload against
//! version `V` always creates version `V + 1`; the version named in the URL
//! is left untouched.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use reqdoc_core::{ComplianceStatus, DocumentId, RequirementId, VersionId};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::extractors::{
    extract_file, extract_json, extract_multipart, extract_query, extract_validated_json,
    parse_key, Validate,
};
use crate::records::{DocumentRecord, VersionRecord};
use crate::service::CreateDocument;
use crate::state::AppState;
use crate::store::{DocumentChanges, DocumentFilter, VersionChanges};

/// Optional equality filter for the document listing.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListDocumentsQuery {
    /// Only return documents of this requirement.
    pub requirement_id: Option<String>,
}

impl ListDocumentsQuery {
    fn into_filter(self) -> Result<DocumentFilter, AppError> {
        let requirement_id = match self.requirement_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_key::<RequirementId>(raw)?),
        };
        Ok(DocumentFilter { requirement_id })
    }
}

/// Request to create a document (with version 1) under a requirement.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDocumentRequest {
    #[schema(value_type = i64)]
    pub requirement_id: RequirementId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Validate for CreateDocumentRequest {
    fn validate(&self) -> Result<(), String> {
        if self.requirement_id.get() <= 0 {
            return Err("requirement_id must be a positive integer".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Partial document update. Omitted fields keep their stored values.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateDocumentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub requirement_id: Option<RequirementId>,
}

impl Validate for UpdateDocumentRequest {
    fn validate(&self) -> Result<(), String> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("name must not be empty".to_string());
        }
        if self.requirement_id.is_some_and(|id| id.get() <= 0) {
            return Err("requirement_id must be a positive integer".to_string());
        }
        Ok(())
    }
}

/// Partial version update. Only status and the archived flag are editable.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateVersionRequest {
    #[schema(value_type = Option<String>, example = "compliant")]
    pub status: Option<ComplianceStatus>,
    pub archived: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentList {
    pub documents: Vec<DocumentRecord>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    pub message: String,
    pub document: DocumentRecord,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VersionResponse {
    pub message: String,
    pub version: VersionRecord,
}

/// Multipart form for a version upload.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadFileForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/documents", get(list_documents).post(create_document))
        .route("/documents/:id", patch(update_document))
        .route("/documents/:id/versions", post(create_version))
        .route("/documents/versions/:id", patch(update_version))
        .route("/documents/versions/:id/upload-file", patch(upload_file))
}

/// GET /documents: Documents with their versions, optionally by requirement.
#[utoipa::path(
    get,
    path = "/documents",
    params(ListDocumentsQuery),
    responses(
        (status = 200, description = "Documents with nested versions", body = DocumentList),
        (status = 400, description = "Malformed requirement_id", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
async fn list_documents(
    State(state): State<AppState>,
    query: Result<Query<ListDocumentsQuery>, QueryRejection>,
) -> Result<Json<DocumentList>, AppError> {
    let filter = extract_query(query)?.into_filter()?;
    let documents = state.documents.list(filter).await?;
    Ok(Json(DocumentList { documents }))
}

/// POST /documents: Create a document and its version 1.
#[utoipa::path(
    post,
    path = "/documents",
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document created", body = DocumentResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorBody),
        (status = 404, description = "Requirement not found", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
async fn create_document(
    State(state): State<AppState>,
    body: Result<Json<CreateDocumentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DocumentResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let document = state
        .documents
        .create(CreateDocument {
            requirement_id: req.requirement_id,
            name: req.name,
            description: req.description,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(DocumentResponse {
            message: "Document created successfully".to_string(),
            document,
        }),
    ))
}

/// PATCH /documents/:id: Update a document's name, description, or requirement.
#[utoipa::path(
    patch,
    path = "/documents/{id}",
    params(("id" = i64, Path, description = "Document ID")),
    request_body = UpdateDocumentRequest,
    responses(
        (status = 200, description = "Document updated", body = DocumentResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorBody),
        (status = 404, description = "Document or requirement not found", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateDocumentRequest>, JsonRejection>,
) -> Result<Json<DocumentResponse>, AppError> {
    let id: DocumentId = parse_key(&id)?;
    let req = extract_validated_json(body)?;
    let document = state
        .documents
        .update(
            id,
            DocumentChanges {
                name: req.name,
                description: req.description,
                requirement_id: req.requirement_id,
            },
        )
        .await?;
    Ok(Json(DocumentResponse {
        message: "Document updated successfully".to_string(),
        document,
    }))
}

/// POST /documents/:id/versions: Append a blank version numbered count + 1.
#[utoipa::path(
    post,
    path = "/documents/{id}/versions",
    params(("id" = i64, Path, description = "Document ID")),
    responses(
        (status = 201, description = "Version created", body = VersionResponse),
        (status = 400, description = "Malformed document ID", body = crate::error::ErrorBody),
        (status = 404, description = "Document not found", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
async fn create_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<VersionResponse>), AppError> {
    let id: DocumentId = parse_key(&id)?;
    let version = state.documents.create_version(id).await?;
    Ok((
        StatusCode::CREATED,
        Json(VersionResponse {
            message: "Document version created successfully".to_string(),
            version,
        }),
    ))
}

/// PATCH /documents/versions/:id: Update a version's status or archived flag.
#[utoipa::path(
    patch,
    path = "/documents/versions/{id}",
    params(("id" = i64, Path, description = "Version ID")),
    request_body = UpdateVersionRequest,
    responses(
        (status = 200, description = "Version updated", body = VersionResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorBody),
        (status = 404, description = "Version not found", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
async fn update_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateVersionRequest>, JsonRejection>,
) -> Result<Json<VersionResponse>, AppError> {
    let id: VersionId = parse_key(&id)?;
    let req = extract_json(body)?;
    let version = state
        .documents
        .update_version(
            id,
            VersionChanges {
                status: req.status,
                archived: req.archived,
            },
        )
        .await?;
    Ok(Json(VersionResponse {
        message: "Document version updated successfully".to_string(),
        version,
    }))
}

/// PATCH /documents/versions/:id/upload-file: Store a file as the next version.
#[utoipa::path(
    patch,
    path = "/documents/versions/{id}/upload-file",
    params(("id" = i64, Path, description = "Version the upload follows")),
    request_body(content = UploadFileForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored as a new version", body = VersionResponse),
        (status = 400, description = "Missing file field or malformed ID", body = crate::error::ErrorBody),
        (status = 404, description = "Version or document not found", body = crate::error::ErrorBody),
        (status = 409, description = "A file is already stored for the next version", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
async fn upload_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VersionResponse>, AppError> {
    let id: VersionId = parse_key(&id)?;
    let mut multipart = extract_multipart(multipart)?;
    let file = extract_file(&mut multipart, "file").await?;
    let version = state
        .documents
        .upload_file(id, &file.file_name, &file.bytes)
        .await?;
    Ok(Json(VersionResponse {
        message: "File uploaded successfully".to_string(),
        version,
    }))
}
