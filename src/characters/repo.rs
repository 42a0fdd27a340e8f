use crate::characters::repo_types::{Character, GUEST_USER_ID};
use crate::store::{
    create_document, get_documents, Collection, DocumentId, DocumentStore, Fields, Filter, Stored,
    StoreError,
};

impl Character {
    /// New character owned by `user_id`, or by the guest sentinel when the id
    /// is missing or empty.
    pub fn new(
        user_id: Option<&str>,
        prompt: String,
        settings: Fields,
        preview_url: Option<String>,
    ) -> Self {
        let user_id = user_id.filter(|id| !id.is_empty()).unwrap_or(GUEST_USER_ID);
        Self {
            user_id: user_id.to_string(),
            prompt,
            settings,
            preview_url,
        }
    }

    pub async fn create(&self, store: &dyn DocumentStore) -> Result<DocumentId, StoreError> {
        create_document(store, self).await
    }

    pub async fn find_by_id(
        store: &dyn DocumentStore,
        id: DocumentId,
    ) -> Result<Option<Stored<Character>>, StoreError> {
        store
            .find_by_id(Collection::Character, id)
            .await?
            .map(|doc| doc.decode())
            .transpose()
    }

    /// Characters whose owner is exactly `user_id`, oldest first.
    pub async fn list_by_user(
        store: &dyn DocumentStore,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Stored<Character>>, StoreError> {
        let filter = Filter::new().eq("user_id", user_id);
        get_documents(store, Collection::Character, &filter, limit)
            .await?
            .into_iter()
            .map(|doc| doc.decode())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use serde_json::json;

    #[test]
    fn owner_defaults_to_guest() {
        let c = Character::new(None, "elf".into(), Fields::new(), None);
        assert_eq!(c.user_id, GUEST_USER_ID);
        let c = Character::new(Some(""), "elf".into(), Fields::new(), None);
        assert_eq!(c.user_id, GUEST_USER_ID);
        let c = Character::new(Some("u1"), "elf".into(), Fields::new(), None);
        assert_eq!(c.user_id, "u1");
    }

    #[tokio::test]
    async fn list_by_user_filters_exactly_and_limits() {
        let store = MemoryDocumentStore::new();
        for (owner, prompt) in [("u1", "a"), ("u2", "b"), ("u1", "c"), ("u1x", "d"), ("u1", "e")] {
            Character::new(Some(owner), prompt.into(), Fields::new(), None)
                .create(&store)
                .await
                .unwrap();
        }

        let all = Character::list_by_user(&store, "u1", 20).await.unwrap();
        let prompts: Vec<_> = all.iter().map(|c| c.record.prompt.as_str()).collect();
        assert_eq!(prompts, ["a", "c", "e"]);

        let two = Character::list_by_user(&store, "u1", 2).await.unwrap();
        assert_eq!(two.len(), 2);

        let none = Character::list_by_user(&store, "u1", 0).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn settings_round_trip_through_the_store() {
        let store = MemoryDocumentStore::new();
        let settings = json!({"style": "anime", "age": 30, "tags": ["a", "b"], "extra": null});
        let settings = settings.as_object().cloned().unwrap();
        let id = Character::new(None, "elf".into(), settings.clone(), Some("u".into()))
            .create(&store)
            .await
            .unwrap();

        let stored = Character::find_by_id(&store, id).await.unwrap().unwrap();
        assert_eq!(stored.record.settings, settings);
        assert_eq!(stored.record.preview_url.as_deref(), Some("u"));
    }
}
