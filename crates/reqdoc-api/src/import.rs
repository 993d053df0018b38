//! # CSV Bulk Import
//!
//! Loads requirements and their documents from a CSV file.
//!
//! ## Format
//!
//! One header row, then data rows with at least four columns:
//!
//! ```text
//! name, description, documents, ...
//! ```
//!
//! The third column lists document names separated by commas (quote the
//! cell). Each trimmed, non-empty entry becomes a document with the
//! description `Auto-generated document for <requirement name>` and a
//! version 1. Columns past the third are ignored.
//!
//! ## Failure handling
//!
//! Import is best-effort and not transactional. Short rows, rows with an
//! empty name, unreadable rows and failed inserts are logged, recorded in the
//! [`ImportSummary`], and skipped; the remaining rows are still imported.

use csv::{ReaderBuilder, StringRecord};
use reqdoc_core::{RequirementId, VersionNumber};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::{NewDocument, NewRequirement, NewVersion, Repository, StoreError};

/// Minimum number of columns in a data row.
pub const MIN_COLUMNS: usize = 4;

/// A row (or one document of a row) that was not imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportIssue {
    /// 1-based line in the input; the header is line 1.
    pub line: u64,
    pub reason: String,
}

/// Outcome of a CSV import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportSummary {
    pub requirements_created: usize,
    pub documents_created: usize,
    pub versions_created: usize,
    pub skipped: Vec<ImportIssue>,
}

impl ImportSummary {
    fn skip(&mut self, line: u64, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(line, reason = %reason, "skipping CSV row");
        self.skipped.push(ImportIssue { line, reason });
    }
}

/// Import every data row of `input` into `repository`.
pub async fn import_csv(repository: &Repository, input: &[u8]) -> ImportSummary {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let mut summary = ImportSummary::default();

    for (index, result) in reader.records().enumerate() {
        // Header is line 1; used when the reader cannot report a position.
        let fallback_line = index as u64 + 2;
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                let line = err
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(fallback_line);
                let fatal = err.is_io_error();
                summary.skip(line, format!("unreadable row: {err}"));
                if fatal {
                    break;
                }
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(fallback_line);
        import_row(repository, &record, line, &mut summary).await;
    }

    tracing::info!(
        requirements = summary.requirements_created,
        documents = summary.documents_created,
        skipped = summary.skipped.len(),
        "CSV import finished"
    );
    summary
}

async fn import_row(
    repository: &Repository,
    record: &StringRecord,
    line: u64,
    summary: &mut ImportSummary,
) {
    if record.len() < MIN_COLUMNS {
        summary.skip(
            line,
            format!(
                "expected at least {MIN_COLUMNS} columns, found {}",
                record.len()
            ),
        );
        return;
    }

    let name = record.get(0).unwrap_or_default().trim();
    if name.is_empty() {
        summary.skip(line, "requirement name is empty");
        return;
    }
    let description = record.get(1).unwrap_or_default().trim();

    let requirement = match repository
        .insert_requirement(NewRequirement {
            name: name.to_string(),
            description: description.to_string(),
        })
        .await
    {
        Ok(requirement) => requirement,
        Err(err) => {
            summary.skip(line, format!("failed to create requirement: {err}"));
            return;
        }
    };
    summary.requirements_created += 1;

    for document_name in document_names(record.get(2).unwrap_or_default()) {
        if let Err(err) =
            import_document(repository, requirement.id, name, document_name, summary).await
        {
            summary.skip(
                line,
                format!("failed to create document '{document_name}': {err}"),
            );
        }
    }
}

async fn import_document(
    repository: &Repository,
    requirement_id: RequirementId,
    requirement_name: &str,
    document_name: &str,
    summary: &mut ImportSummary,
) -> Result<(), StoreError> {
    let document = repository
        .insert_document(NewDocument {
            requirement_id,
            name: document_name.to_string(),
            description: format!("Auto-generated document for {requirement_name}"),
        })
        .await?;
    summary.documents_created += 1;

    repository
        .insert_version(NewVersion::blank(document.id, VersionNumber::FIRST))
        .await?;
    summary.versions_created += 1;
    Ok(())
}

/// Split a document-list cell on `,`, trimming entries and dropping empties.
pub fn document_names(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(',').map(str::trim).filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentFilter;

    #[test]
    fn splits_trims_and_drops_empty_names() {
        let names: Vec<&str> = document_names("A, B,,C").collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(document_names(" , ").count(), 0);
    }

    #[tokio::test]
    async fn imports_documents_with_first_version() {
        let repository = Repository::in_memory();
        let csv = "name,description,documents,owner\n\
                   Access control,Limit access,\"A, B,,C\",security\n";
        let summary = import_csv(&repository, csv.as_bytes()).await;

        assert_eq!(summary.requirements_created, 1);
        assert_eq!(summary.documents_created, 3);
        assert_eq!(summary.versions_created, 3);
        assert!(summary.skipped.is_empty());

        let docs = repository
            .list_documents(&DocumentFilter::default())
            .await
            .unwrap();
        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        for doc in &docs {
            assert_eq!(doc.versions.len(), 1);
            assert_eq!(doc.versions[0].version, VersionNumber::FIRST);
            assert_eq!(doc.description, "Auto-generated document for Access control");
        }
    }

    #[tokio::test]
    async fn short_row_is_skipped_and_reported() {
        let repository = Repository::in_memory();
        let csv = "name,description,documents,owner\n\
                   R1,d,D1,x\n\
                   R2,d,D2,x\n\
                   R3,d\n\
                   R4,d,D4,x\n";
        let summary = import_csv(&repository, csv.as_bytes()).await;

        assert_eq!(summary.requirements_created, 3);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].line, 4);

        let names: Vec<String> = repository
            .list_requirements()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["R1", "R2", "R4"]);
    }

    #[tokio::test]
    async fn empty_name_is_skipped() {
        let repository = Repository::in_memory();
        let csv = "name,description,documents,owner\n  ,d,D1,x\nR2,d,,x\n";
        let summary = import_csv(&repository, csv.as_bytes()).await;
        assert_eq!(summary.requirements_created, 1);
        assert_eq!(summary.documents_created, 0);
        assert_eq!(summary.skipped[0].line, 2);
        assert!(summary.skipped[0].reason.contains("empty"));
    }

    #[tokio::test]
    async fn header_only_imports_nothing() {
        let repository = Repository::in_memory();
        let summary = import_csv(&repository, b"name,description,documents,owner\n").await;
        assert_eq!(summary, ImportSummary::default());
    }
}
