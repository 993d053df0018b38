//! # API Route Modules
//!
//! - `requirements`: list and create requirements.
//! - `documents`: documents, version creation and metadata, file uploads.
//! - `import`: CSV bulk import.
//!
//! Path keys arrive as strings and are parsed into typed keys inside the
//! handlers, so a malformed key yields the standard JSON 400 body.

pub mod documents;
pub mod import;
pub mod requirements;
