//! # Record Types
//!
//! API-layer representations of requirements, documents and document
//! versions, as returned by both storage backends and serialized in
//! responses.
//!
//! Statuses on [`RequirementRecord`] and [`DocumentRecord`] are derived, not
//! stored: they are computed by [`RequirementRecord::with_documents`] and
//! [`DocumentRecord::with_versions`] every time a record is assembled.

use chrono::{DateTime, Utc};
use reqdoc_core::{
    document_status, requirement_status, ComplianceStatus, DocumentId, RequirementId, VersionId,
    VersionNumber, VersionState,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One revision of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VersionRecord {
    #[schema(value_type = i64)]
    pub id: VersionId,
    #[schema(value_type = i64)]
    pub document_id: DocumentId,
    /// Per-document revision number, starting at 1.
    #[schema(value_type = i32, minimum = 1)]
    pub version: VersionNumber,
    /// Where the uploaded file was saved. `None` until a file is attached.
    pub path: Option<String>,
    pub archived: bool,
    #[schema(value_type = String, example = "non-compliant")]
    pub status: ComplianceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VersionRecord {
    /// The fields the current-version rule looks at.
    pub fn state(&self) -> VersionState {
        VersionState {
            id: self.id,
            number: self.version,
            archived: self.archived,
            status: self.status,
        }
    }
}

/// A document with its full version history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DocumentRecord {
    #[schema(value_type = i64)]
    pub id: DocumentId,
    #[schema(value_type = i64)]
    pub requirement_id: RequirementId,
    pub name: String,
    pub description: String,
    /// Status of the current (latest non-archived) version.
    #[schema(value_type = String, example = "compliant")]
    pub status: ComplianceStatus,
    /// Versions ordered by number, then key.
    pub versions: Vec<VersionRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Attach the version history and derive the document status from it.
    pub fn with_versions(mut self, mut versions: Vec<VersionRecord>) -> Self {
        versions.sort_by_key(|v| (v.version, v.id));
        self.status = document_status(versions.iter().map(VersionRecord::state));
        self.versions = versions;
        self
    }
}

/// A requirement with its documents and derived status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RequirementRecord {
    #[schema(value_type = i64)]
    pub id: RequirementId,
    pub name: String,
    pub description: String,
    /// `compliant` iff every document is compliant (or there are none).
    #[schema(value_type = String, example = "non-compliant")]
    pub status: ComplianceStatus,
    pub documents: Vec<DocumentRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RequirementRecord {
    /// Attach the documents and derive the requirement status from them.
    pub fn with_documents(mut self, documents: Vec<DocumentRecord>) -> Self {
        self.status = requirement_status(documents.iter().map(|d| d.status));
        self.documents = documents;
        self
    }
}
