//! Requirement persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `requirements` table.
//! Returned records carry no documents; the repository attaches them.

use chrono::{DateTime, Utc};
use reqdoc_core::{ComplianceStatus, RequirementId};
use sqlx::PgPool;

use crate::records::RequirementRecord;
use crate::store::NewRequirement;

/// Insert a requirement and return the stored row.
pub async fn insert(pool: &PgPool, new: &NewRequirement) -> Result<RequirementRecord, sqlx::Error> {
    let row = sqlx::query_as::<_, RequirementRow>(
        "INSERT INTO requirements (name, description)
         VALUES ($1, $2)
         RETURNING id, name, description, created_at, updated_at",
    )
    .bind(&new.name)
    .bind(&new.description)
    .fetch_one(pool)
    .await?;

    Ok(row.into_record())
}

/// Whether a live requirement with this key exists.
pub async fn exists(pool: &PgPool, id: RequirementId) -> Result<bool, sqlx::Error> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT id FROM requirements WHERE id = $1 AND deleted_at IS NULL")
            .bind(id.get())
            .fetch_optional(pool)
            .await?;

    Ok(found.is_some())
}

/// List all live requirements in key order.
pub async fn list(pool: &PgPool) -> Result<Vec<RequirementRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RequirementRow>(
        "SELECT id, name, description, created_at, updated_at
         FROM requirements WHERE deleted_at IS NULL ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(RequirementRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct RequirementRow {
    id: i64,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RequirementRow {
    fn into_record(self) -> RequirementRecord {
        RequirementRecord {
            id: RequirementId::new(self.id),
            name: self.name,
            description: self.description,
            status: ComplianceStatus::Compliant,
            documents: Vec::new(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
