//! PostgreSQL backend: assembles nested records from the per-table queries.

use reqdoc_core::DocumentId;
use sqlx::PgPool;

use super::{assemble_documents, assemble_requirements, DocumentFilter, StoreError};
use crate::db;
use crate::records::{DocumentRecord, RequirementRecord};

pub(super) async fn list_requirements(
    pool: &PgPool,
) -> Result<Vec<RequirementRecord>, StoreError> {
    let requirements = db::requirements::list(pool).await?;
    let documents = list_documents(pool, &DocumentFilter::default()).await?;
    Ok(assemble_requirements(requirements, documents))
}

pub(super) async fn list_documents(
    pool: &PgPool,
    filter: &DocumentFilter,
) -> Result<Vec<DocumentRecord>, StoreError> {
    let documents = db::documents::list(pool, filter.requirement_id).await?;
    if documents.is_empty() {
        return Ok(documents);
    }
    let ids: Vec<i64> = documents.iter().map(|d| d.id.get()).collect();
    let versions = db::versions::list_for_documents(pool, &ids).await?;
    Ok(assemble_documents(documents, versions))
}

pub(super) async fn get_document(
    pool: &PgPool,
    id: DocumentId,
) -> Result<Option<DocumentRecord>, StoreError> {
    let Some(document) = db::documents::get(pool, id).await? else {
        return Ok(None);
    };
    let versions = db::versions::list_for_documents(pool, &[id.get()]).await?;
    Ok(Some(document.with_versions(versions)))
}
