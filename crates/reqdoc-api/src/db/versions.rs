//! Document version persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `document_versions`
//! table. [`insert_next`] locks the owning `documents` row for the duration
//! of its transaction, which serializes version numbering per document.

use chrono::{DateTime, Utc};
use reqdoc_core::{ComplianceStatus, DocumentId, VersionId, VersionNumber};
use sqlx::{PgExecutor, PgPool};

use crate::records::VersionRecord;
use crate::store::{NewVersion, VersionChanges};

/// Insert a version with the number given in `new`.
pub async fn insert(pool: &PgPool, new: &NewVersion) -> Result<VersionRecord, sqlx::Error> {
    insert_row(pool, new).await
}

/// Insert a blank version numbered `count(existing) + 1`.
///
/// Returns `None` (and inserts nothing) if the document does not exist.
pub async fn insert_next(
    pool: &PgPool,
    document_id: DocumentId,
) -> Result<Option<VersionRecord>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let locked: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM documents WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
    )
    .bind(document_id.get())
    .fetch_optional(&mut *tx)
    .await?;

    if locked.is_none() {
        tx.rollback().await?;
        return Ok(None);
    }

    let existing: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM document_versions WHERE document_id = $1 AND deleted_at IS NULL",
    )
    .bind(document_id.get())
    .fetch_one(&mut *tx)
    .await?;

    let number = VersionNumber::after_count(usize::try_from(existing).unwrap_or_default());
    let record = insert_row(&mut *tx, &NewVersion::blank(document_id, number)).await?;

    tx.commit().await?;
    Ok(Some(record))
}

/// Fetch a live version by key.
pub async fn get(pool: &PgPool, id: VersionId) -> Result<Option<VersionRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, VersionRow>(
        "SELECT id, document_id, version, path, archived, status, created_at, updated_at
         FROM document_versions WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id.get())
    .fetch_optional(pool)
    .await?;

    Ok(row.and_then(VersionRow::into_record))
}

/// All live versions of the given documents, ordered by document, number, key.
pub async fn list_for_documents(
    pool: &PgPool,
    document_ids: &[i64],
) -> Result<Vec<VersionRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, VersionRow>(
        "SELECT id, document_id, version, path, archived, status, created_at, updated_at
         FROM document_versions
         WHERE document_id = ANY($1) AND deleted_at IS NULL
         ORDER BY document_id, version, id",
    )
    .bind(document_ids)
    .fetch_all(pool)
    .await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        match row.into_record() {
            Some(record) => records.push(record),
            None => {
                tracing::error!("skipping document version row with invalid number during list");
            }
        }
    }
    Ok(records)
}

/// Apply the present fields of `changes`. Returns `None` if no live row matched.
pub async fn update(
    pool: &PgPool,
    id: VersionId,
    changes: &VersionChanges,
) -> Result<Option<VersionRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, VersionRow>(
        "UPDATE document_versions SET
             status = COALESCE($1, status),
             archived = COALESCE($2, archived),
             updated_at = now()
         WHERE id = $3 AND deleted_at IS NULL
         RETURNING id, document_id, version, path, archived, status, created_at, updated_at",
    )
    .bind(changes.status.map(|s| s.as_str()))
    .bind(changes.archived)
    .bind(id.get())
    .fetch_optional(pool)
    .await?;

    Ok(row.and_then(VersionRow::into_record))
}

async fn insert_row<'e, E>(executor: E, new: &NewVersion) -> Result<VersionRecord, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, VersionRow>(
        "INSERT INTO document_versions (document_id, version, path, archived, status)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, document_id, version, path, archived, status, created_at, updated_at",
    )
    .bind(new.document_id.get())
    .bind(new.version.get())
    .bind(new.path.as_deref())
    .bind(new.archived)
    .bind(new.status.as_str())
    .fetch_one(executor)
    .await?;

    row.into_record().ok_or_else(|| {
        sqlx::Error::Decode(format!("inserted version {} is not positive", new.version).into())
    })
}

fn parse_status(s: &str) -> ComplianceStatus {
    match s.parse() {
        Ok(status) => status,
        Err(_) => {
            tracing::warn!(
                status = s,
                "unknown version status in database, defaulting to non-compliant"
            );
            ComplianceStatus::NonCompliant
        }
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct VersionRow {
    id: i64,
    document_id: i64,
    version: i32,
    path: Option<String>,
    archived: bool,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VersionRow {
    fn into_record(self) -> Option<VersionRecord> {
        let version = match VersionNumber::new(i64::from(self.version)) {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    id = self.id,
                    version = self.version,
                    "skipping document version row with non-positive number"
                );
                return None;
            }
        };
        Some(VersionRecord {
            id: VersionId::new(self.id),
            document_id: DocumentId::new(self.document_id),
            version,
            path: self.path,
            archived: self.archived,
            status: parse_status(&self.status),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(version: i32, status: &str) -> VersionRow {
        let now = Utc::now();
        VersionRow {
            id: 1,
            document_id: 2,
            version,
            path: Some("uploads/Policy_1.pdf".to_string()),
            archived: false,
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn row_maps_to_record() {
        let record = row(3, "pending").into_record().unwrap();
        assert_eq!(record.version.get(), 3);
        assert_eq!(record.status, ComplianceStatus::Pending);
        assert_eq!(record.document_id, DocumentId::new(2));
    }

    #[test]
    fn unknown_status_defaults_to_non_compliant() {
        let record = row(1, "approved").into_record().unwrap();
        assert_eq!(record.status, ComplianceStatus::NonCompliant);
    }

    #[test]
    fn non_positive_number_is_skipped() {
        assert!(row(0, "compliant").into_record().is_none());
    }
}
