//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Every field is a cheap-to-clone handle; the
//! repository is the only owner of data.

use crate::config::AppConfig;
use crate::service::{DocumentsService, RequirementsService};
use crate::store::Repository;
use crate::uploads::FileStorage;

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub repository: Repository,
    pub requirements: RequirementsService,
    pub documents: DocumentsService,
}

impl AppState {
    /// Wire services over `repository`, storing uploads under
    /// `config.uploads_dir`.
    pub fn new(config: AppConfig, repository: Repository) -> Self {
        let storage = FileStorage::new(config.uploads_dir.clone());
        Self {
            requirements: RequirementsService::new(repository.clone()),
            documents: DocumentsService::new(repository.clone(), storage),
            repository,
            config,
        }
    }

    /// In-memory state with default configuration.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(config, Repository::in_memory())
    }
}
