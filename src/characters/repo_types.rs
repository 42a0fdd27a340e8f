use serde::{Deserialize, Serialize};

use crate::store::{Collection, Fields, Record};

/// Owner recorded for characters generated without a user id.
pub const GUEST_USER_ID: &str = "guest";

/// Character record in the `character` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub user_id: String, // a user id or GUEST_USER_ID, never checked
    pub prompt: String,
    #[serde(default)]
    pub settings: Fields, // free-form JSON object
    #[serde(default)]
    pub preview_url: Option<String>,
}

impl Record for Character {
    const COLLECTION: Collection = Collection::Character;
}
