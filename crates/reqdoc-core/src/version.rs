//! # Document Versions
//!
//! Version numbering and the rule for picking a document's current version.
//!
//! ## Numbering
//!
//! - Explicit creation numbers the new version `count(existing) + 1`
//!   ([`VersionNumber::after_count`]).
//! - An upload against version `V` creates version `V + 1`
//!   ([`VersionNumber::next`]).
//!
//! Neither rule looks at the numbers already taken, so the two paths can
//! produce duplicates when they interleave. Serializing explicit creation
//! per document is the caller's job.
//!
//! ## Current version
//!
//! A document's status is the status of its non-archived version with the
//! highest number (ties broken by the highest key). A document with no such
//! version is `NonCompliant`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::VersionId;
use crate::status::ComplianceStatus;

/// Positive, per-document revision number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct VersionNumber(i32);

impl VersionNumber {
    /// The number given to a document's first version.
    pub const FIRST: VersionNumber = VersionNumber(1);

    /// Validate a raw number read from storage or a client.
    pub fn new(raw: i64) -> Result<Self, ValidationError> {
        match i32::try_from(raw) {
            Ok(n) if n > 0 => Ok(Self(n)),
            _ => Err(ValidationError::InvalidVersionNumber(raw)),
        }
    }

    /// Number for a version created after `count` existing versions.
    pub fn after_count(count: usize) -> Self {
        let count = i32::try_from(count).unwrap_or(i32::MAX);
        Self(count.saturating_add(1))
    }

    /// The number following this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Access the raw number (the `INTEGER` column value).
    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i64> for VersionNumber {
    type Error = ValidationError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<VersionNumber> for i64 {
    fn from(n: VersionNumber) -> Self {
        i64::from(n.0)
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fields of a version that the current-version rule looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionState {
    /// Store key, used to break ties between equal numbers.
    pub id: VersionId,
    /// Revision number.
    pub number: VersionNumber,
    /// Archived versions never count as current.
    pub archived: bool,
    /// Status recorded on the version.
    pub status: ComplianceStatus,
}

/// Pick the current version: non-archived, highest number, then highest key.
pub fn current_version<I>(versions: I) -> Option<VersionState>
where
    I: IntoIterator<Item = VersionState>,
{
    versions
        .into_iter()
        .filter(|v| !v.archived)
        .max_by_key(|v| (v.number, v.id))
}

/// Status of a document, taken from its current version.
pub fn document_status<I>(versions: I) -> ComplianceStatus
where
    I: IntoIterator<Item = VersionState>,
{
    current_version(versions)
        .map(|v| v.status)
        .unwrap_or(ComplianceStatus::NonCompliant)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(id: i64, number: i64, archived: bool, status: ComplianceStatus) -> VersionState {
        VersionState {
            id: VersionId::new(id),
            number: VersionNumber::new(number).unwrap(),
            archived,
            status,
        }
    }

    #[test]
    fn after_count_is_count_plus_one() {
        assert_eq!(VersionNumber::after_count(0), VersionNumber::FIRST);
        assert_eq!(VersionNumber::after_count(4).get(), 5);
    }

    #[test]
    fn next_increments() {
        assert_eq!(VersionNumber::FIRST.next().get(), 2);
    }

    #[test]
    fn rejects_non_positive_numbers() {
        assert_eq!(
            VersionNumber::new(0),
            Err(ValidationError::InvalidVersionNumber(0))
        );
        assert!(VersionNumber::new(-1).is_err());
        assert!(VersionNumber::new(i64::from(i32::MAX) + 1).is_err());
    }

    #[test]
    fn serde_rejects_zero() {
        assert!(serde_json::from_str::<VersionNumber>("0").is_err());
        let n: VersionNumber = serde_json::from_str("3").unwrap();
        assert_eq!(n.get(), 3);
        assert_eq!(serde_json::to_string(&n).unwrap(), "3");
    }

    #[test]
    fn document_without_versions_is_non_compliant() {
        assert_eq!(
            document_status(Vec::<VersionState>::new()),
            ComplianceStatus::NonCompliant
        );
    }

    #[test]
    fn latest_non_archived_version_wins() {
        let versions = vec![
            state(1, 1, false, ComplianceStatus::NonCompliant),
            state(2, 2, false, ComplianceStatus::Compliant),
            state(3, 3, true, ComplianceStatus::Pending),
        ];
        assert_eq!(document_status(versions), ComplianceStatus::Compliant);
    }

    #[test]
    fn all_archived_is_non_compliant() {
        let versions = vec![state(1, 1, true, ComplianceStatus::Compliant)];
        assert!(current_version(versions.clone()).is_none());
        assert_eq!(document_status(versions), ComplianceStatus::NonCompliant);
    }

    #[test]
    fn duplicate_numbers_break_ties_by_key() {
        let versions = vec![
            state(10, 2, false, ComplianceStatus::Waiting),
            state(11, 2, false, ComplianceStatus::Compliant),
            state(4, 1, false, ComplianceStatus::Pending),
        ];
        let current = current_version(versions).unwrap();
        assert_eq!(current.id, VersionId::new(11));
        assert_eq!(current.status, ComplianceStatus::Compliant);
    }
}
