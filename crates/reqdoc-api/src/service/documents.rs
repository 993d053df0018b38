//! Document and document version lifecycle.
//!
//! - Creating a document also creates its version 1.
//! - [`DocumentsService::create_version`] appends version `count + 1`.
//! - [`DocumentsService::upload_file`] never edits the version it is called
//!   on: it stores the file and appends version `V + 1`, carrying over the
//!   archived flag and resetting the status.

use reqdoc_core::{
    non_empty_name, upload_file_name, ComplianceStatus, DocumentId, RequirementId, VersionId,
    VersionNumber,
};

use super::ServiceError;
use crate::records::{DocumentRecord, VersionRecord};
use crate::store::{
    DocumentChanges, DocumentFilter, NewDocument, NewVersion, Repository, VersionChanges,
};
use crate::uploads::FileStorage;

/// Input for [`DocumentsService::create`].
#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub requirement_id: RequirementId,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct DocumentsService {
    repository: Repository,
    storage: FileStorage,
}

impl DocumentsService {
    pub fn new(repository: Repository, storage: FileStorage) -> Self {
        Self {
            repository,
            storage,
        }
    }

    pub async fn list(&self, filter: DocumentFilter) -> Result<Vec<DocumentRecord>, ServiceError> {
        Ok(self.repository.list_documents(&filter).await?)
    }

    /// Create a document under an existing requirement, with version 1.
    pub async fn create(&self, input: CreateDocument) -> Result<DocumentRecord, ServiceError> {
        let name = non_empty_name("name", input.name)?;
        self.ensure_requirement(input.requirement_id).await?;

        let document = self
            .repository
            .insert_document(NewDocument {
                requirement_id: input.requirement_id,
                name,
                description: input.description,
            })
            .await?;
        let first = self
            .repository
            .insert_version(NewVersion::blank(document.id, VersionNumber::FIRST))
            .await?;

        tracing::info!(
            document_id = %document.id,
            requirement_id = %document.requirement_id,
            "document created"
        );
        Ok(document.with_versions(vec![first]))
    }

    /// Apply a partial update to a document.
    pub async fn update(
        &self,
        id: DocumentId,
        mut changes: DocumentChanges,
    ) -> Result<DocumentRecord, ServiceError> {
        if let Some(name) = changes.name.take() {
            changes.name = Some(non_empty_name("name", name)?);
        }
        if let Some(requirement_id) = changes.requirement_id {
            self.ensure_requirement(requirement_id).await?;
        }
        self.repository
            .update_document(id, &changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("document", id))
    }

    /// Append a blank version numbered one past the current count.
    pub async fn create_version(&self, id: DocumentId) -> Result<VersionRecord, ServiceError> {
        let version = self
            .repository
            .insert_next_version(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("document", id))?;
        tracing::info!(
            document_id = %id,
            version = %version.version,
            "document version created"
        );
        Ok(version)
    }

    /// Apply a partial update to a version's status and archived flag.
    pub async fn update_version(
        &self,
        id: VersionId,
        changes: VersionChanges,
    ) -> Result<VersionRecord, ServiceError> {
        self.repository
            .update_version(id, &changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("version", id))
    }

    /// Store an uploaded file as the version following `version_id`.
    pub async fn upload_file(
        &self,
        version_id: VersionId,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<VersionRecord, ServiceError> {
        let current = self
            .repository
            .get_version(version_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("version", version_id))?;
        let document = self
            .repository
            .get_document(current.document_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("document", current.document_id))?;

        let number = current.version.next();
        let stored_name = upload_file_name(document.id, &document.name, number, file_name);
        let path = self.storage.save(&stored_name, bytes).await?;

        let version = self
            .repository
            .insert_version(NewVersion {
                document_id: document.id,
                version: number,
                path: Some(path.to_string_lossy().into_owned()),
                archived: current.archived,
                status: ComplianceStatus::default(),
            })
            .await?;

        tracing::info!(
            document_id = %document.id,
            from_version = %current.version,
            version = %version.version,
            size = bytes.len(),
            "document file uploaded"
        );
        Ok(version)
    }

    async fn ensure_requirement(&self, id: RequirementId) -> Result<(), ServiceError> {
        if self.repository.requirement_exists(id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found("requirement", id))
        }
    }
}
