use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{Collection, Document, DocumentId, DocumentStore, Fields, Filter, StoreError};

/// In-process document store. Documents are kept per collection in insertion
/// order and lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// True when `fields` would repeat a unique value already held by another
/// document in `docs`.
fn violates_unique(
    collection: Collection,
    docs: &[Document],
    skip: Option<DocumentId>,
    fields: &Fields,
) -> bool {
    collection.unique_fields().iter().any(|key| {
        let Some(value) = fields.get(*key) else {
            return false;
        };
        docs.iter()
            .filter(|d| Some(d.id) != skip)
            .any(|d| d.fields.get(*key) == Some(value))
    })
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        fields: Fields,
    ) -> Result<DocumentId, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        if violates_unique(collection, docs, None, &fields) {
            return Err(StoreError::Duplicate(collection));
        }

        let now = OffsetDateTime::now_utc();
        let id = DocumentId::new();
        docs.push(Document {
            id,
            created_at: now,
            updated_at: now,
            fields,
        });
        Ok(id)
    }

    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| filter.matches(&d.fields))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn update_fields(
        &self,
        collection: Collection,
        id: DocumentId,
        fields: Fields,
    ) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(None);
        };
        if violates_unique(collection, docs, Some(id), &fields) {
            return Err(StoreError::Duplicate(collection));
        }
        let Some(doc) = docs.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };

        doc.fields.extend(fields);
        doc.updated_at = OffsetDateTime::now_utc();
        Ok(Some(doc.clone()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
