use std::{fmt, str::FromStr};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

mod memory;
mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Document fields as stored, minus the store-managed id and timestamps.
pub type Fields = Map<String, Value>;

/// Every collection the service persists to.
///
/// This is the only place entity types are tied to collection names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    User,
    Character,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::User, Collection::Character];

    pub fn name(self) -> &'static str {
        match self {
            Collection::User => "user",
            Collection::Character => "character",
        }
    }

    /// Fields whose values must be unique across the collection.
    pub fn unique_fields(self) -> &'static [&'static str] {
        match self {
            Collection::User => &["email"],
            Collection::Character => &[],
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Store-assigned document identifier. Clients only ever see its string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DocumentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

#[derive(Debug, Error)]
#[error("malformed document id")]
pub struct InvalidDocumentId;

impl FromStr for DocumentId {
    type Err = InvalidDocumentId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self).map_err(|_| InvalidDocumentId)
    }
}

/// A stored document as returned by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub fields: Fields,
}

impl Document {
    /// Decode the fields into a domain record, keeping the store metadata.
    pub fn decode<R: Record>(self) -> Result<Stored<R>, StoreError> {
        let record = serde_json::from_value(Value::Object(self.fields))?;
        Ok(Stored {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            record,
        })
    }
}

/// A domain record together with the metadata the store attached to it.
#[derive(Debug, Clone)]
pub struct Stored<R> {
    pub id: DocumentId,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub record: R,
}

/// A domain type persisted as one document in a fixed collection.
pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: Collection;
}

/// Equality filter: a document matches when every entry equals the
/// corresponding field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Fields);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn matches(&self, fields: &Fields) -> bool {
        self.0
            .iter()
            .all(|(key, expected)| fields.get(key) == Some(expected))
    }

    pub fn as_fields(&self) -> &Fields {
        &self.0
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate value for a unique field in `{0}`")]
    Duplicate(Collection),

    #[error("document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("database error: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Document store backend used by every handler.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: Collection, fields: Fields)
        -> Result<DocumentId, StoreError>;

    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError>;

    async fn find_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<Option<Document>, StoreError>;

    /// Merge `fields` into the document; `None` when no document has `id`.
    async fn update_fields(
        &self,
        collection: Collection,
        id: DocumentId,
        fields: Fields,
    ) -> Result<Option<Document>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Serialize `record` and insert it into its collection.
pub async fn create_document<R: Record>(
    store: &dyn DocumentStore,
    record: &R,
) -> Result<DocumentId, StoreError> {
    let fields = match serde_json::to_value(record)? {
        Value::Object(fields) => fields,
        _ => return Err(StoreError::NotAnObject),
    };
    let collection = R::COLLECTION;
    let id = store.insert(collection, fields).await?;
    tracing::debug!(%collection, %id, "document created");
    Ok(id)
}

/// Documents in `collection` matching `filter`, at most `limit`, in insertion
/// order.
pub async fn get_documents(
    store: &dyn DocumentStore,
    collection: Collection,
    filter: &Filter,
    limit: usize,
) -> Result<Vec<Document>, StoreError> {
    if limit == 0 {
        return Ok(Vec::new());
    }
    store.find_many(collection, filter, limit).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collection_names_are_lowercase_entity_names() {
        assert_eq!(Collection::User.name(), "user");
        assert_eq!(Collection::Character.name(), "character");
        assert_eq!(Collection::User.unique_fields(), &["email"]);
        assert!(Collection::Character.unique_fields().is_empty());
    }

    #[test]
    fn document_id_parses_its_own_display() {
        let id = DocumentId::new();
        let parsed: DocumentId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn document_id_rejects_malformed_strings() {
        assert!("".parse::<DocumentId>().is_err());
        assert!("not-an-id".parse::<DocumentId>().is_err());
        assert!("507f1f77bcf86cd799439011".parse::<DocumentId>().is_err());

        let padded = format!(" {} ", DocumentId::new());
        assert!(padded.parse::<DocumentId>().is_err());
    }

    #[test]
    fn filter_requires_every_entry_to_match() {
        let fields = json!({"email": "a@x.com", "plan": "free"});
        let fields = fields.as_object().unwrap();

        assert!(Filter::new().matches(fields));
        assert!(Filter::new().eq("email", "a@x.com").matches(fields));
        assert!(Filter::new()
            .eq("email", "a@x.com")
            .eq("plan", "free")
            .matches(fields));
        assert!(!Filter::new()
            .eq("email", "a@x.com")
            .eq("plan", "pro")
            .matches(fields));
        assert!(!Filter::new().eq("missing", "x").matches(fields));
    }
}
