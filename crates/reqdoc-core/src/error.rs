//! # Validation Errors
//!
//! Structured errors for rejected domain values, built with `thiserror`.

use thiserror::Error;

/// A domain value failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An identifier was not a positive integer.
    #[error("invalid {kind} identifier: \"{value}\"")]
    InvalidIdentifier {
        /// Which identifier was being parsed ("requirement", "document", "version").
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A name field was empty or whitespace-only.
    #[error("{field} must not be empty")]
    EmptyName {
        /// The offending field.
        field: &'static str,
    },

    /// A status string is not one of the known values.
    #[error("unknown compliance status: \"{0}\" (expected compliant, non-compliant, pending or waiting)")]
    UnknownStatus(String),

    /// A version number was zero or negative.
    #[error("version number must be positive, got {0}")]
    InvalidVersionNumber(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_message_names_kind_and_value() {
        let err = ValidationError::InvalidIdentifier {
            kind: "document",
            value: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("document"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn empty_name_message() {
        let err = ValidationError::EmptyName { field: "name" };
        assert_eq!(err.to_string(), "name must not be empty");
    }
}
