#![deny(missing_docs)]

//! # reqdoc-core: Domain Primitives for the Requirement Tracker
//!
//! Types and pure rules shared by the API service and the CLI. This crate
//! performs no I/O and has no async code; it depends only on `serde` and
//! `thiserror`.
//!
//! ## Contents
//!
//! - [`RequirementId`], [`DocumentId`], [`VersionId`]: typed store keys.
//!   You cannot pass a document key where a version key is expected.
//! - [`ComplianceStatus`]: the four-valued status enumeration, with the
//!   requirement-level aggregation rule [`requirement_status`].
//! - [`VersionNumber`] and [`document_status`]: per-document version
//!   numbering and the "current version" rule.
//! - [`upload_file_name`]: storage file name for an uploaded revision.
//! - [`ValidationError`]: every way a domain value can be rejected.

pub mod error;
pub mod identity;
pub mod naming;
pub mod status;
pub mod version;

pub use error::ValidationError;
pub use identity::{DocumentId, RequirementId, VersionId};
pub use naming::{non_empty_name, upload_file_name};
pub use status::{requirement_status, ComplianceStatus};
pub use version::{current_version, document_status, VersionNumber, VersionState};
