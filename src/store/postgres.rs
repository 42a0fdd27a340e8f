use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Collection, Document, DocumentId, DocumentStore, Fields, Filter, StoreError};

/// Document store over PostgreSQL: one table per collection, document body in
/// a JSONB column. Tables are created by `migrations/`.
#[derive(Clone)]
pub struct PgDocumentStore {
    db: PgPool,
}

impl PgDocumentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    doc: Json<Fields>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<DocumentRow> for Document {
    fn from(r: DocumentRow) -> Self {
        Self {
            id: r.id.into(),
            created_at: r.created_at,
            updated_at: r.updated_at,
            fields: r.doc.0,
        }
    }
}

// Collection names come from the fixed `Collection` table, never from input.
fn table(collection: Collection) -> String {
    format!("\"{}\"", collection.name())
}

fn write_error(collection: Collection, e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::Duplicate(collection);
        }
    }
    StoreError::Backend(e)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        fields: Fields,
    ) -> Result<DocumentId, StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2) RETURNING id",
            table(collection)
        );
        let id = sqlx::query_scalar::<_, Uuid>(&sql)
            .bind(DocumentId::new().as_uuid())
            .bind(Json(fields))
            .fetch_one(&self.db)
            .await
            .map_err(|e| write_error(collection, e))?;
        Ok(id.into())
    }

    async fn find_many(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let sql = format!(
            r#"
            SELECT id, doc, created_at, updated_at
              FROM {}
             WHERE doc @> $1
             ORDER BY seq ASC
             LIMIT $2
            "#,
            table(collection)
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(Json(filter.as_fields()))
            .bind(limit)
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        let sql = format!(
            "SELECT id, doc, created_at, updated_at FROM {} WHERE id = $1",
            table(collection)
        );
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Document::from))
    }

    async fn update_fields(
        &self,
        collection: Collection,
        id: DocumentId,
        fields: Fields,
    ) -> Result<Option<Document>, StoreError> {
        let sql = format!(
            r#"
            UPDATE {}
               SET doc = doc || $2, updated_at = now()
             WHERE id = $1
            RETURNING id, doc, created_at, updated_at
            "#,
            table(collection)
        );
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(id.as_uuid())
            .bind(Json(fields))
            .fetch_optional(&self.db)
            .await
            .map_err(|e| write_error(collection, e))?;
        Ok(row.map(Document::from))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}
