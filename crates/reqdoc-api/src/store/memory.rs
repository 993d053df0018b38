//! In-memory backend.
//!
//! Each table is a [`Table`]: a `BTreeMap` keyed by a sequentially assigned
//! key behind a `parking_lot::RwLock`. The lock is never held across an
//! `.await`, so every operation here is synchronous.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use reqdoc_core::{ComplianceStatus, DocumentId, RequirementId, VersionId, VersionNumber};

use super::{
    assemble_documents, assemble_requirements, DocumentChanges, DocumentFilter, NewDocument,
    NewRequirement, NewVersion, VersionChanges,
};
use crate::records::{DocumentRecord, RequirementRecord, VersionRecord};

#[derive(Debug)]
struct TableInner<T> {
    next_key: i64,
    rows: BTreeMap<i64, T>,
}

/// Thread-safe, cloneable table with store-assigned keys starting at 1.
#[derive(Debug)]
pub(crate) struct Table<T: Clone + Send + Sync> {
    inner: Arc<RwLock<TableInner<T>>>,
}

impl<T: Clone + Send + Sync> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + Sync> Table<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(TableInner {
                next_key: 1,
                rows: BTreeMap::new(),
            })),
        }
    }

    /// Assign the next key and insert the row built by `build`.
    ///
    /// `build` sees the current rows under the same write lock, so anything
    /// it derives from them (counts, for instance) cannot go stale before the
    /// insert.
    pub(crate) fn insert_with(&self, build: impl FnOnce(i64, &BTreeMap<i64, T>) -> T) -> T {
        let mut guard = self.inner.write();
        let key = guard.next_key;
        guard.next_key += 1;
        let row = build(key, &guard.rows);
        guard.rows.insert(key, row.clone());
        row
    }

    pub(crate) fn get(&self, key: i64) -> Option<T> {
        self.inner.read().rows.get(&key).cloned()
    }

    pub(crate) fn contains(&self, key: i64) -> bool {
        self.inner.read().rows.contains_key(&key)
    }

    /// All rows in key order.
    pub(crate) fn list(&self) -> Vec<T> {
        self.inner.read().rows.values().cloned().collect()
    }

    /// Rows matching `pred`, in key order.
    pub(crate) fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.inner
            .read()
            .rows
            .values()
            .filter(|row| pred(row))
            .cloned()
            .collect()
    }

    /// Update a row in place. Returns the updated row, or `None` if not found.
    pub(crate) fn update(&self, key: i64, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.inner.write();
        let row = guard.rows.get_mut(&key)?;
        f(row);
        Some(row.clone())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.read().rows.len()
    }
}

/// In-memory tables for the three entity kinds.
///
/// Requirements and documents are stored without their nested collections;
/// those are attached on every read.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    requirements: Table<RequirementRecord>,
    documents: Table<DocumentRecord>,
    versions: Table<VersionRecord>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            requirements: Table::new(),
            documents: Table::new(),
            versions: Table::new(),
        }
    }

    pub(super) fn list_requirements(&self) -> Vec<RequirementRecord> {
        let documents = self.list_documents(&DocumentFilter::default());
        assemble_requirements(self.requirements.list(), documents)
    }

    pub(super) fn insert_requirement(&self, new: NewRequirement) -> RequirementRecord {
        let now = Utc::now();
        self.requirements.insert_with(|key, _| RequirementRecord {
            id: RequirementId::new(key),
            name: new.name,
            description: new.description,
            status: ComplianceStatus::Compliant,
            documents: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub(super) fn requirement_exists(&self, id: RequirementId) -> bool {
        self.requirements.contains(id.get())
    }

    pub(super) fn list_documents(&self, filter: &DocumentFilter) -> Vec<DocumentRecord> {
        let documents = self.documents.filter(|doc| filter.matches(doc));
        assemble_documents(documents, self.versions.list())
    }

    pub(super) fn get_document(&self, id: DocumentId) -> Option<DocumentRecord> {
        let document = self.documents.get(id.get())?;
        let versions = self.versions.filter(|v| v.document_id == id);
        Some(document.with_versions(versions))
    }

    pub(super) fn insert_document(&self, new: NewDocument) -> DocumentRecord {
        let now = Utc::now();
        self.documents.insert_with(|key, _| DocumentRecord {
            id: DocumentId::new(key),
            requirement_id: new.requirement_id,
            name: new.name,
            description: new.description,
            status: ComplianceStatus::NonCompliant,
            versions: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub(super) fn update_document(
        &self,
        id: DocumentId,
        changes: &DocumentChanges,
    ) -> Option<DocumentRecord> {
        self.documents.update(id.get(), |doc| {
            if let Some(name) = &changes.name {
                doc.name = name.clone();
            }
            if let Some(description) = &changes.description {
                doc.description = description.clone();
            }
            if let Some(requirement_id) = changes.requirement_id {
                doc.requirement_id = requirement_id;
            }
            doc.updated_at = Utc::now();
        })?;
        self.get_document(id)
    }

    pub(super) fn get_version(&self, id: VersionId) -> Option<VersionRecord> {
        self.versions.get(id.get())
    }

    pub(super) fn insert_version(&self, new: NewVersion) -> VersionRecord {
        let now = Utc::now();
        self.versions.insert_with(|key, _| VersionRecord {
            id: VersionId::new(key),
            document_id: new.document_id,
            version: new.version,
            path: new.path,
            archived: new.archived,
            status: new.status,
            created_at: now,
            updated_at: now,
        })
    }

    pub(super) fn insert_next_version(&self, document_id: DocumentId) -> Option<VersionRecord> {
        // Documents are never removed, so the existence check cannot go stale.
        if !self.documents.contains(document_id.get()) {
            return None;
        }
        let now = Utc::now();
        let record = self.versions.insert_with(|key, rows| {
            let existing = rows
                .values()
                .filter(|v| v.document_id == document_id)
                .count();
            VersionRecord {
                id: VersionId::new(key),
                document_id,
                version: VersionNumber::after_count(existing),
                path: None,
                archived: false,
                status: ComplianceStatus::default(),
                created_at: now,
                updated_at: now,
            }
        });
        Some(record)
    }

    pub(super) fn update_version(
        &self,
        id: VersionId,
        changes: &VersionChanges,
    ) -> Option<VersionRecord> {
        self.versions.update(id.get(), |version| {
            if let Some(status) = changes.status {
                version.status = status;
            }
            if let Some(archived) = changes.archived {
                version.archived = archived;
            }
            version.updated_at = Utc::now();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_document() -> (MemoryStore, DocumentId) {
        let store = MemoryStore::new();
        let req = store.insert_requirement(NewRequirement {
            name: "SOC 2".to_string(),
            description: String::new(),
        });
        let doc = store.insert_document(NewDocument {
            requirement_id: req.id,
            name: "Access policy".to_string(),
            description: String::new(),
        });
        (store, doc.id)
    }

    #[test]
    fn table_assigns_sequential_keys() {
        let table: Table<i64> = Table::new();
        assert_eq!(table.insert_with(|key, _| key), 1);
        assert_eq!(table.insert_with(|key, _| key * 10), 20);
        assert_eq!(table.list(), vec![1, 20]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn table_clone_shares_rows() {
        let table: Table<String> = Table::new();
        let clone = table.clone();
        table.insert_with(|_, _| "a".to_string());
        assert_eq!(clone.get(1).as_deref(), Some("a"));
    }

    #[test]
    fn table_update_missing_returns_none() {
        let table: Table<i64> = Table::new();
        assert!(table.update(7, |v| *v += 1).is_none());
    }

    #[test]
    fn next_version_counts_existing() {
        let (store, doc) = store_with_document();
        assert_eq!(store.insert_next_version(doc).unwrap().version.get(), 1);
        assert_eq!(store.insert_next_version(doc).unwrap().version.get(), 2);
        assert_eq!(store.insert_next_version(doc).unwrap().version.get(), 3);
    }

    #[test]
    fn next_version_on_missing_document() {
        let (store, _) = store_with_document();
        assert!(store.insert_next_version(DocumentId::new(99)).is_none());
        assert_eq!(store.versions.len(), 0);
    }

    #[test]
    fn update_version_keeps_omitted_fields() {
        let (store, doc) = store_with_document();
        let v = store.insert_next_version(doc).unwrap();
        let updated = store
            .update_version(
                v.id,
                &VersionChanges {
                    status: Some(ComplianceStatus::Pending),
                    archived: None,
                },
            )
            .unwrap();
        assert_eq!(updated.status, ComplianceStatus::Pending);
        assert!(!updated.archived);
        assert_eq!(updated.version, v.version);
    }

    #[test]
    fn documents_are_filtered_by_requirement() {
        let (store, _) = store_with_document();
        let other = store.insert_requirement(NewRequirement {
            name: "GDPR".to_string(),
            description: String::new(),
        });
        store.insert_document(NewDocument {
            requirement_id: other.id,
            name: "DPA".to_string(),
            description: String::new(),
        });
        let filter = DocumentFilter {
            requirement_id: Some(other.id),
        };
        let docs = store.list_documents(&filter);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "DPA");
        assert_eq!(store.list_documents(&DocumentFilter::default()).len(), 2);
    }

    #[test]
    fn requirements_carry_documents_and_status() {
        let (store, doc) = store_with_document();
        let v = store.insert_next_version(doc).unwrap();
        let reqs = store.list_requirements();
        assert_eq!(reqs[0].documents.len(), 1);
        assert_eq!(reqs[0].status, ComplianceStatus::NonCompliant);

        store.update_version(
            v.id,
            &VersionChanges {
                status: Some(ComplianceStatus::Compliant),
                archived: None,
            },
        );
        let reqs = store.list_requirements();
        assert_eq!(reqs[0].status, ComplianceStatus::Compliant);
    }
}
