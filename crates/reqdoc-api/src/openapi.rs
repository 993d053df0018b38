//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "reqdoc API",
        description = "Compliance requirements, their supporting documents, and versioned document uploads.\n\nRequirement and document statuses are derived on every read: a document takes the status of its latest non-archived version, and a requirement is compliant iff all of its documents are."
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::routes::requirements::list_requirements,
        crate::routes::requirements::create_requirement,
        crate::routes::documents::list_documents,
        crate::routes::documents::create_document,
        crate::routes::documents::update_document,
        crate::routes::documents::create_version,
        crate::routes::documents::update_version,
        crate::routes::documents::upload_file,
        crate::routes::import::upload_csv,
    ),
    components(schemas(
        crate::records::RequirementRecord,
        crate::records::DocumentRecord,
        crate::records::VersionRecord,
        crate::routes::requirements::CreateRequirementRequest,
        crate::routes::requirements::RequirementList,
        crate::routes::requirements::RequirementResponse,
        crate::routes::documents::CreateDocumentRequest,
        crate::routes::documents::UpdateDocumentRequest,
        crate::routes::documents::UpdateVersionRequest,
        crate::routes::documents::DocumentList,
        crate::routes::documents::DocumentResponse,
        crate::routes::documents::VersionResponse,
        crate::routes::documents::UploadFileForm,
        crate::routes::import::ImportResponse,
        crate::routes::import::CsvUploadForm,
        crate::import::ImportSummary,
        crate::import::ImportIssue,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "requirements", description = "Compliance requirements with derived status"),
        (name = "documents", description = "Documents, versions, and file uploads"),
        (name = "import", description = "CSV bulk import"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_generates_successfully() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "reqdoc API");
    }

    #[test]
    fn spec_has_all_paths() {
        let spec = ApiDoc::openapi();
        for path in [
            "/requirements",
            "/documents",
            "/documents/{id}",
            "/documents/{id}/versions",
            "/documents/versions/{id}",
            "/documents/versions/{id}/upload-file",
            "/upload-csv",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn spec_has_record_schemas() {
        let spec = ApiDoc::openapi();
        let schemas = &spec.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("DocumentRecord"));
        assert!(schemas.contains_key("ErrorBody"));
    }
}
