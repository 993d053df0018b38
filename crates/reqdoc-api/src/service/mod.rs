//! # Services
//!
//! Thin orchestration between the HTTP handlers and the [`Repository`].
//! Services validate inputs, check that referenced rows exist, and decide
//! version numbers. They hold no state of their own beyond cloneable
//! handles, so they are cheap to clone into [`crate::state::AppState`].
//!
//! [`Repository`]: crate::store::Repository

mod documents;
mod requirements;

pub use documents::{CreateDocument, DocumentsService};
pub use requirements::{CreateRequirement, RequirementsService};

use reqdoc_core::ValidationError;
use thiserror::Error;

use crate::store::StoreError;
use crate::uploads::StorageError;

/// Errors raised by the service layer.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A key, name, or other argument was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The referenced row does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The storage backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Storing an uploaded file failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ServiceError {
    pub(crate) fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
