use crate::auth::{password::hash_password, repo_types::{Plan, User}};
use crate::store::{
    create_document, get_documents, Collection, DocumentId, DocumentStore, Fields, Filter, Stored,
    StoreError,
};

/// Local part of an email, or the whole string when it has no `@`.
pub(crate) fn default_username(email: &str) -> &str {
    email.split_once('@').map_or(email, |(local, _)| local)
}

impl User {
    /// New user on the free plan. A missing or empty username falls back to
    /// the email's local part.
    pub fn new(email: &str, username: Option<&str>, password: &str) -> Self {
        let username = username
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| default_username(email));
        Self {
            email: email.to_string(),
            username: username.to_string(),
            password_hash: hash_password(password),
            plan: Plan::Free,
        }
    }

    pub async fn create(&self, store: &dyn DocumentStore) -> Result<DocumentId, StoreError> {
        create_document(store, self).await
    }

    async fn find_one(
        store: &dyn DocumentStore,
        filter: Filter,
    ) -> Result<Option<Stored<User>>, StoreError> {
        get_documents(store, Collection::User, &filter, 1)
            .await?
            .into_iter()
            .next()
            .map(|doc| doc.decode())
            .transpose()
    }

    /// Find a user by email.
    pub async fn find_by_email(
        store: &dyn DocumentStore,
        email: &str,
    ) -> Result<Option<Stored<User>>, StoreError> {
        Self::find_one(store, Filter::new().eq("email", email)).await
    }

    /// Find the user whose email and password digest both match.
    pub async fn find_by_credentials(
        store: &dyn DocumentStore,
        email: &str,
        password: &str,
    ) -> Result<Option<Stored<User>>, StoreError> {
        let filter = Filter::new()
            .eq("email", email)
            .eq("password_hash", hash_password(password));
        Self::find_one(store, filter).await
    }

    pub async fn find_by_id(
        store: &dyn DocumentStore,
        id: DocumentId,
    ) -> Result<Option<Stored<User>>, StoreError> {
        store
            .find_by_id(Collection::User, id)
            .await?
            .map(|doc| doc.decode())
            .transpose()
    }

    /// Set the plan; `None` when no user has `id`.
    pub async fn set_plan(
        store: &dyn DocumentStore,
        id: DocumentId,
        plan: Plan,
    ) -> Result<Option<Stored<User>>, StoreError> {
        let mut fields = Fields::new();
        fields.insert("plan".into(), plan.as_str().into());
        store
            .update_fields(Collection::User, id, fields)
            .await?
            .map(|doc| doc.decode())
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;

    #[test]
    fn username_defaults_to_email_local_part() {
        assert_eq!(User::new("a@x.com", None, "pw1").username, "a");
        assert_eq!(User::new("a@x.com", Some(""), "pw1").username, "a");
        assert_eq!(User::new("a@x.com", Some("ann"), "pw1").username, "ann");
        assert_eq!(default_username("no-at-sign"), "no-at-sign");
        assert_eq!(default_username("a@b@c"), "a");
    }

    #[tokio::test]
    async fn credentials_lookup_requires_matching_password() {
        let store = MemoryDocumentStore::new();
        let id = User::new("a@x.com", None, "pw1").create(&store).await.unwrap();

        let found = User::find_by_credentials(&store, "a@x.com", "pw1")
            .await
            .unwrap()
            .expect("credentials should match");
        assert_eq!(found.id, id);
        assert_eq!(found.record.plan, Plan::Free);

        let wrong = User::find_by_credentials(&store, "a@x.com", "pw2").await.unwrap();
        assert!(wrong.is_none());
    }

    #[tokio::test]
    async fn set_plan_updates_existing_users_only() {
        let store = MemoryDocumentStore::new();
        let id = User::new("a@x.com", None, "pw1").create(&store).await.unwrap();

        let updated = User::set_plan(&store, id, Plan::Pro).await.unwrap().unwrap();
        assert_eq!(updated.record.plan, Plan::Pro);

        let missing = User::set_plan(&store, DocumentId::new(), Plan::Pro).await.unwrap();
        assert!(missing.is_none());
    }
}
