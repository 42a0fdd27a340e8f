use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::characters::repo_types::Character;
use crate::store::{Fields, Stored};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default)]
    pub settings: Fields,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}
fn default_limit() -> usize { 20 }

#[derive(Debug, Serialize)]
pub struct CharacterResponse {
    pub id: String,
    pub user_id: String,
    pub prompt: String,
    pub settings: Fields,
    pub preview_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Stored<Character>> for CharacterResponse {
    fn from(s: Stored<Character>) -> Self {
        Self {
            id: s.id.to_string(),
            user_id: s.record.user_id,
            prompt: s.record.prompt,
            settings: s.record.settings,
            preview_url: s.record.preview_url,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}
