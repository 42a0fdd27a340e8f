use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo_types::{Plan, User};
use crate::store::Stored;

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct MeQuery {
    pub user_id: String,
}

/// Request body for a plan change.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub user_id: String,
    pub plan: String,
}

/// User as returned to the client; the password digest stays server-side.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub username: String,
    pub plan: Plan,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Stored<User>> for PublicUser {
    fn from(s: Stored<User>) -> Self {
        Self {
            id: s.id.to_string(),
            email: s.record.email,
            username: s.record.username,
            plan: s.record.plan,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentId;

    #[test]
    fn public_user_hides_password_hash() {
        let now = OffsetDateTime::now_utc();
        let user = PublicUser::from(Stored {
            id: DocumentId::new(),
            created_at: now,
            updated_at: now,
            record: User::new("test@example.com", None, "secret"),
        });

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["email"], "test@example.com");
        assert_eq!(json["username"], "test");
        assert_eq!(json["plan"], "free");
        assert!(json["id"].is_string());
        assert!(json.get("password_hash").is_none());
        assert!(json.get("_id").is_none());
    }
}
