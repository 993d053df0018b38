//! Document persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `documents` table.
//! Returned records carry no versions; the repository attaches them.

use chrono::{DateTime, Utc};
use reqdoc_core::{ComplianceStatus, DocumentId, RequirementId};
use sqlx::PgPool;

use crate::records::DocumentRecord;
use crate::store::{DocumentChanges, NewDocument};

/// Insert a document and return the stored row.
pub async fn insert(pool: &PgPool, new: &NewDocument) -> Result<DocumentRecord, sqlx::Error> {
    let row = sqlx::query_as::<_, DocumentRow>(
        "INSERT INTO documents (requirement_id, name, description)
         VALUES ($1, $2, $3)
         RETURNING id, requirement_id, name, description, created_at, updated_at",
    )
    .bind(new.requirement_id.get())
    .bind(&new.name)
    .bind(&new.description)
    .fetch_one(pool)
    .await?;

    Ok(row.into_record())
}

/// Fetch a live document by key.
pub async fn get(pool: &PgPool, id: DocumentId) -> Result<Option<DocumentRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, DocumentRow>(
        "SELECT id, requirement_id, name, description, created_at, updated_at
         FROM documents WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id.get())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(DocumentRow::into_record))
}

/// List live documents in key order, optionally for one requirement only.
pub async fn list(
    pool: &PgPool,
    requirement_id: Option<RequirementId>,
) -> Result<Vec<DocumentRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, DocumentRow>(
        "SELECT id, requirement_id, name, description, created_at, updated_at
         FROM documents
         WHERE deleted_at IS NULL AND ($1::BIGINT IS NULL OR requirement_id = $1)
         ORDER BY id",
    )
    .bind(requirement_id.map(RequirementId::get))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(DocumentRow::into_record).collect())
}

/// Apply the present fields of `changes`. Returns `false` if no live row matched.
pub async fn update(
    pool: &PgPool,
    id: DocumentId,
    changes: &DocumentChanges,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE documents SET
             name = COALESCE($1, name),
             description = COALESCE($2, description),
             requirement_id = COALESCE($3, requirement_id),
             updated_at = now()
         WHERE id = $4 AND deleted_at IS NULL",
    )
    .bind(changes.name.as_deref())
    .bind(changes.description.as_deref())
    .bind(changes.requirement_id.map(RequirementId::get))
    .bind(id.get())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: i64,
    requirement_id: i64,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DocumentRow {
    fn into_record(self) -> DocumentRecord {
        DocumentRecord {
            id: DocumentId::new(self.id),
            requirement_id: RequirementId::new(self.requirement_id),
            name: self.name,
            description: self.description,
            status: ComplianceStatus::NonCompliant,
            versions: Vec::new(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
