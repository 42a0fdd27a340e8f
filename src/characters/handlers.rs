use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    characters::repo_types::Character,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiQuery},
    state::AppState,
};

use super::dto::{CharacterResponse, GenerateQuery, GenerateRequest, ListQuery};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/characters", get(list_characters))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/characters/generate", post(generate_character))
}

/// POST /characters/generate
/// No real generation happens: the preview is the configured placeholder.
#[instrument(skip(state, body))]
pub async fn generate_character(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<GenerateQuery>,
    ApiJson(body): ApiJson<GenerateRequest>,
) -> ApiResult<Json<CharacterResponse>> {
    let store = state.store()?;

    let character = Character::new(
        query.user_id.as_deref(),
        body.prompt,
        body.settings,
        Some(state.config.preview_url.clone()),
    );
    let id = character.create(store).await?;
    let character = Character::find_by_id(store, id)
        .await?
        .ok_or(ApiError::NotFound("Character not found"))?;

    info!(character_id = %character.id, user_id = %character.record.user_id, "character generated");
    Ok(Json(character.into()))
}

#[instrument(skip(state))]
pub async fn list_characters(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<Vec<CharacterResponse>>> {
    let store = state.store()?;

    let characters = Character::list_by_user(store, &query.user_id, query.limit).await?;
    Ok(Json(characters.into_iter().map(Into::into).collect()))
}
