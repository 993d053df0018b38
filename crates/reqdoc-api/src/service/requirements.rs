//! Requirement listing and creation.

use reqdoc_core::non_empty_name;

use super::ServiceError;
use crate::records::RequirementRecord;
use crate::store::{NewRequirement, Repository};

/// Input for [`RequirementsService::create`].
#[derive(Debug, Clone)]
pub struct CreateRequirement {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct RequirementsService {
    repository: Repository,
}

impl RequirementsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All requirements with nested documents, each with a derived status.
    pub async fn list(&self) -> Result<Vec<RequirementRecord>, ServiceError> {
        Ok(self.repository.list_requirements().await?)
    }

    pub async fn create(
        &self,
        input: CreateRequirement,
    ) -> Result<RequirementRecord, ServiceError> {
        let name = non_empty_name("name", input.name)?;
        let record = self
            .repository
            .insert_requirement(NewRequirement {
                name,
                description: input.description,
            })
            .await?;
        tracing::info!(requirement_id = %record.id, name = %record.name, "requirement created");
        Ok(record.with_documents(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqdoc_core::ComplianceStatus;

    #[tokio::test]
    async fn create_then_list() {
        let service = RequirementsService::new(Repository::in_memory());
        let created = service
            .create(CreateRequirement {
                name: "ISO 27001 A.5".to_string(),
                description: "Information security policies".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.status, ComplianceStatus::Compliant);

        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert!(listed[0].documents.is_empty());
    }

    #[tokio::test]
    async fn blank_name_is_invalid() {
        let service = RequirementsService::new(Repository::in_memory());
        let err = service
            .create(CreateRequirement {
                name: "  ".to_string(),
                description: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }
}
