use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, MeQuery, PlanRequest, PublicUser, SignupRequest},
        repo_types::{Plan, User},
    },
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiQuery},
    state::AppState,
    store::DocumentId,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/user/plan", post(update_plan))
}

fn parse_user_id(raw: &str) -> ApiResult<DocumentId> {
    raw.parse().map_err(|_| {
        warn!(user_id = %raw, "malformed user id");
        ApiError::BadRequest("Invalid user id")
    })
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> ApiResult<Json<PublicUser>> {
    let store = state.store()?;

    // Ensure email is not taken
    if User::find_by_email(store, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict);
    }

    let user = User::new(
        &payload.email,
        payload.username.as_deref(),
        &payload.password,
    );
    let id = user.create(store).await?;
    let user = User::find_by_id(store, id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    info!(user_id = %user.id, email = %user.record.email, "user registered");
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<PublicUser>> {
    let store = state.store()?;

    let Some(user) = User::find_by_credentials(store, &payload.email, &payload.password).await?
    else {
        warn!(email = %payload.email, "login rejected");
        return Err(ApiError::Unauthorized);
    };

    info!(user_id = %user.id, email = %user.record.email, "user logged in");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MeQuery>,
) -> ApiResult<Json<PublicUser>> {
    let store = state.store()?;
    let id = parse_user_id(&query.user_id)?;

    let user = User::find_by_id(store, id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn update_plan(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PlanRequest>,
) -> ApiResult<Json<PublicUser>> {
    let store = state.store()?;

    let plan: Plan = payload.plan.parse().map_err(|_| {
        warn!(plan = %payload.plan, "invalid plan");
        ApiError::BadRequest("Invalid plan")
    })?;
    let id = parse_user_id(&payload.user_id)?;

    let user = User::set_plan(store, id, plan)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    info!(user_id = %user.id, %plan, "plan updated");
    Ok(Json(user.into()))
}
