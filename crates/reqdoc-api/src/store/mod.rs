//! # Repository
//!
//! Data access for requirements, documents and versions behind one handle.
//!
//! ## Backends
//!
//! When `DATABASE_URL` is configured the repository runs against PostgreSQL
//! through the per-table functions in [`crate::db`]. Without it, an
//! in-memory backend is used (development and tests). Both backends return
//! fully assembled records: documents carry their versions and requirements
//! carry their documents, with statuses derived on every read.
//!
//! ## Version creation
//!
//! [`Repository::insert_next_version`] counts and inserts atomically per
//! document, so concurrent callers always receive distinct numbers.
//! [`Repository::insert_version`] inserts whatever number it is given.

mod memory;
mod postgres;

use std::collections::BTreeMap;

use reqdoc_core::{ComplianceStatus, DocumentId, RequirementId, VersionId, VersionNumber};
use sqlx::PgPool;
use thiserror::Error;

use crate::records::{DocumentRecord, RequirementRecord, VersionRecord};

pub use memory::MemoryStore;

/// Errors raised by a storage backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database rejected or failed a query.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Fields of a requirement to be created.
#[derive(Debug, Clone)]
pub struct NewRequirement {
    pub name: String,
    pub description: String,
}

/// Fields of a document to be created.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub requirement_id: RequirementId,
    pub name: String,
    pub description: String,
}

/// Fields of a version to be inserted with an already chosen number.
#[derive(Debug, Clone)]
pub struct NewVersion {
    pub document_id: DocumentId,
    pub version: VersionNumber,
    pub path: Option<String>,
    pub archived: bool,
    pub status: ComplianceStatus,
}

impl NewVersion {
    /// A version with default metadata: no file, not archived, non-compliant.
    pub fn blank(document_id: DocumentId, version: VersionNumber) -> Self {
        Self {
            document_id,
            version,
            path: None,
            archived: false,
            status: ComplianceStatus::default(),
        }
    }
}

/// Partial update of a document. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct DocumentChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub requirement_id: Option<RequirementId>,
}

/// Partial update of a version. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct VersionChanges {
    pub status: Option<ComplianceStatus>,
    pub archived: Option<bool>,
}

/// Equality filter for document listings. The default matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    pub requirement_id: Option<RequirementId>,
}

impl DocumentFilter {
    pub fn matches(&self, document: &DocumentRecord) -> bool {
        self.requirement_id
            .map_or(true, |id| document.requirement_id == id)
    }
}

#[derive(Debug, Clone)]
enum Backend {
    Memory(MemoryStore),
    Postgres(PgPool),
}

/// Cloneable handle to the configured storage backend.
#[derive(Debug, Clone)]
pub struct Repository {
    backend: Backend,
}

impl Repository {
    /// Repository backed by process memory. Contents are lost on restart.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryStore::new()),
        }
    }

    /// Repository backed by PostgreSQL. Migrations must already be applied.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            backend: Backend::Postgres(pool),
        }
    }

    /// Short backend name for logs and readiness output.
    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            Backend::Memory(_) => "memory",
            Backend::Postgres(_) => "postgres",
        }
    }

    /// Check that the backend can serve queries.
    pub async fn ping(&self) -> Result<(), StoreError> {
        match &self.backend {
            Backend::Memory(_) => Ok(()),
            Backend::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
        }
    }

    /// All requirements with their documents and versions.
    pub async fn list_requirements(&self) -> Result<Vec<RequirementRecord>, StoreError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.list_requirements()),
            Backend::Postgres(pool) => postgres::list_requirements(pool).await,
        }
    }

    pub async fn insert_requirement(
        &self,
        new: NewRequirement,
    ) -> Result<RequirementRecord, StoreError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.insert_requirement(new)),
            Backend::Postgres(pool) => Ok(crate::db::requirements::insert(pool, &new).await?),
        }
    }

    pub async fn requirement_exists(&self, id: RequirementId) -> Result<bool, StoreError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.requirement_exists(id)),
            Backend::Postgres(pool) => Ok(crate::db::requirements::exists(pool, id).await?),
        }
    }

    /// Documents matching `filter`, each with its versions, in key order.
    pub async fn list_documents(
        &self,
        filter: &DocumentFilter,
    ) -> Result<Vec<DocumentRecord>, StoreError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.list_documents(filter)),
            Backend::Postgres(pool) => postgres::list_documents(pool, filter).await,
        }
    }

    pub async fn get_document(&self, id: DocumentId) -> Result<Option<DocumentRecord>, StoreError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.get_document(id)),
            Backend::Postgres(pool) => postgres::get_document(pool, id).await,
        }
    }

    /// Insert a document without any versions.
    pub async fn insert_document(&self, new: NewDocument) -> Result<DocumentRecord, StoreError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.insert_document(new)),
            Backend::Postgres(pool) => Ok(crate::db::documents::insert(pool, &new).await?),
        }
    }

    /// Apply `changes` to an existing document. `None` if it does not exist.
    pub async fn update_document(
        &self,
        id: DocumentId,
        changes: &DocumentChanges,
    ) -> Result<Option<DocumentRecord>, StoreError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.update_document(id, changes)),
            Backend::Postgres(pool) => {
                if crate::db::documents::update(pool, id, changes).await? {
                    postgres::get_document(pool, id).await
                } else {
                    Ok(None)
                }
            }
        }
    }

    pub async fn get_version(&self, id: VersionId) -> Result<Option<VersionRecord>, StoreError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.get_version(id)),
            Backend::Postgres(pool) => Ok(crate::db::versions::get(pool, id).await?),
        }
    }

    pub async fn insert_version(&self, new: NewVersion) -> Result<VersionRecord, StoreError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.insert_version(new)),
            Backend::Postgres(pool) => Ok(crate::db::versions::insert(pool, &new).await?),
        }
    }

    /// Append a blank version numbered `count(existing) + 1`.
    ///
    /// Returns `None` if the document does not exist.
    pub async fn insert_next_version(
        &self,
        document_id: DocumentId,
    ) -> Result<Option<VersionRecord>, StoreError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.insert_next_version(document_id)),
            Backend::Postgres(pool) => {
                Ok(crate::db::versions::insert_next(pool, document_id).await?)
            }
        }
    }

    /// Apply `changes` to an existing version. `None` if it does not exist.
    pub async fn update_version(
        &self,
        id: VersionId,
        changes: &VersionChanges,
    ) -> Result<Option<VersionRecord>, StoreError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.update_version(id, changes)),
            Backend::Postgres(pool) => Ok(crate::db::versions::update(pool, id, changes).await?),
        }
    }
}

/// Attach each document's versions. Document order is preserved.
pub(crate) fn assemble_documents(
    documents: Vec<DocumentRecord>,
    versions: Vec<VersionRecord>,
) -> Vec<DocumentRecord> {
    let mut by_document: BTreeMap<DocumentId, Vec<VersionRecord>> = BTreeMap::new();
    for version in versions {
        by_document
            .entry(version.document_id)
            .or_default()
            .push(version);
    }
    documents
        .into_iter()
        .map(|doc| {
            let versions = by_document.remove(&doc.id).unwrap_or_default();
            doc.with_versions(versions)
        })
        .collect()
}

/// Attach each requirement's (already assembled) documents.
pub(crate) fn assemble_requirements(
    requirements: Vec<RequirementRecord>,
    documents: Vec<DocumentRecord>,
) -> Vec<RequirementRecord> {
    let mut by_requirement: BTreeMap<RequirementId, Vec<DocumentRecord>> = BTreeMap::new();
    for doc in documents {
        by_requirement
            .entry(doc.requirement_id)
            .or_default()
            .push(doc);
    }
    requirements
        .into_iter()
        .map(|req| {
            let documents = by_requirement.remove(&req.id).unwrap_or_default();
            req.with_documents(documents)
        })
        .collect()
}
