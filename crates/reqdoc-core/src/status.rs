//! # Compliance Status
//!
//! The status enumeration shared by requirements and document versions, and
//! the rule that derives a requirement's status from its documents.
//!
//! Requirement status is never stored as ground truth: it is recomputed from
//! the owned documents every time requirements are listed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Status of a requirement or document version relative to audit criteria.
///
/// Serialized in kebab-case (`"non-compliant"`), matching the stored column
/// values. New versions default to [`ComplianceStatus::NonCompliant`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceStatus {
    /// Meets the audit criteria.
    Compliant,
    /// Does not (yet) meet the audit criteria.
    #[default]
    NonCompliant,
    /// Awaiting review.
    Pending,
    /// Blocked on an external party.
    Waiting,
}

impl ComplianceStatus {
    /// Every status value, in declaration order.
    pub const ALL: [ComplianceStatus; 4] = [
        Self::Compliant,
        Self::NonCompliant,
        Self::Pending,
        Self::Waiting,
    ];

    /// Return the wire/storage representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::NonCompliant => "non-compliant",
            Self::Pending => "pending",
            Self::Waiting => "waiting",
        }
    }

    /// Whether this status is exactly [`ComplianceStatus::Compliant`].
    pub fn is_compliant(&self) -> bool {
        matches!(self, Self::Compliant)
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-sensitive: `"Compliant"` is rejected.
impl FromStr for ComplianceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownStatus(s.to_string()))
    }
}

/// Derive a requirement's status from the statuses of its documents.
///
/// `Compliant` iff every document is `Compliant`; otherwise `NonCompliant`.
/// A requirement with no documents is `Compliant` (vacuous truth).
pub fn requirement_status<I>(document_statuses: I) -> ComplianceStatus
where
    I: IntoIterator<Item = ComplianceStatus>,
{
    if document_statuses.into_iter().all(|s| s.is_compliant()) {
        ComplianceStatus::Compliant
    } else {
        ComplianceStatus::NonCompliant
    }
}
